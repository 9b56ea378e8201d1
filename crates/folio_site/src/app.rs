//! The portfolio application
//!
//! [`PortfolioApp`] owns the page and one controller per enabled feature.
//! Every feature is set up on its own: markup missing for one of them
//! disables only that feature. Input arrives as [`Event`]s, time only moves
//! through [`PortfolioApp::advance`], which runs due timers and animation
//! frames on the virtual clock.

use folio_core::{
    event_types, Debounce, ElementId, Event, EventData, KeyCode, MemoryStore, Page,
    PreferenceStore,
};
use folio_theme::{ColorScheme, ThemeController};

use crate::config::{SetupMode, SiteConfig};
use crate::contact::{ContactForm, ValidationReport};
use crate::context::{Runtime, Task, FRAME_MS};
use crate::demo::build_demo_page;
use crate::error::{Result, SiteError};
use crate::filters::ProjectFilters;
use crate::hero::{HeroEntrance, TypingEffect};
use crate::menu::MobileMenu;
use crate::navbar::{Navbar, ScrollTopButton};
use crate::navigation::Navigation;
use crate::notification::Notification;
use crate::resume::{Download, DownloadSink, MemorySink, ResumeDownload};
use crate::reveal::{LazyImages, RevealAnimator, SkillBars};

/// Quiet period after the last resize before layout-dependent state is
/// recomputed
const RESIZE_DEBOUNCE_MS: u64 = 150;

/// A feature that could not be set up in strict mode
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupFailure {
    pub feature: &'static str,
    pub message: String,
}

pub struct PortfolioAppBuilder {
    config: SiteConfig,
    page: Option<Page>,
    store: Box<dyn PreferenceStore>,
    sink: Box<dyn DownloadSink>,
    system_scheme: Option<ColorScheme>,
}

impl PortfolioAppBuilder {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            page: None,
            store: Box::new(MemoryStore::new()),
            sink: Box::new(MemorySink::new()),
            system_scheme: None,
        }
    }

    /// Page to run on; the demo page when not set
    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn sink(mut self, sink: impl DownloadSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// OS colour scheme reported at startup
    pub fn system_scheme(mut self, scheme: Option<ColorScheme>) -> Self {
        self.system_scheme = scheme;
        self
    }

    pub fn build(self) -> PortfolioApp {
        let config = self.config;
        let page = self.page.unwrap_or_else(build_demo_page);
        let mut rt = Runtime::new(
            page,
            config.notifications.clone(),
            config.navigation.scroll_duration_ms,
        );
        match config.navigation.easing() {
            Ok(easing) => rt.scroll_easing = easing,
            Err(e) => tracing::warn!("{e}; smooth scrolls use ease-in-out"),
        }

        let mut theme = ThemeController::new(config.theme.clone());
        theme.init(&mut rt.page, self.store.as_ref(), self.system_scheme);

        let mut setup = FeatureSetup {
            mode: config.setup,
            failures: Vec::new(),
        };
        let theme_toggle = setup.run("theme-toggle", true, || {
            rt.require("theme-toggle", &config.theme.toggle_selector)
        });
        let navigation = setup.run("navigation", config.navigation.enabled, || {
            Navigation::setup(&mut rt, &config.navigation)
        });
        let menu = setup.run("mobile-menu", config.menu.enabled, || {
            MobileMenu::setup(&mut rt, &config.menu)
        });
        let navbar = setup.run("navbar", config.navbar.enabled, || {
            Navbar::setup(&mut rt, &config.navbar)
        });
        let scroll_top = setup.run("scroll-to-top", config.scroll_top.enabled, || {
            ScrollTopButton::setup(&mut rt, &config.scroll_top)
        });
        let reveal = setup.run("reveal", config.reveal.enabled, || {
            RevealAnimator::setup(&mut rt, &config.reveal)
        });
        let skills = setup.run("skill-bars", config.skills.enabled, || {
            SkillBars::setup(&mut rt, &config.skills)
        });
        let lazy_images = setup.run("lazy-images", config.lazy_images.enabled, || {
            LazyImages::setup(&mut rt, &config.lazy_images)
        });
        let hero = setup.run("hero", config.hero.enabled, || {
            HeroEntrance::setup(&mut rt, &config.hero)
        });
        let typing = setup.run("typing-effect", config.typing.enabled, || {
            TypingEffect::setup(&mut rt, &config.typing)
        });
        let filters = setup.run("project-filters", config.filters.enabled, || {
            ProjectFilters::setup(&mut rt, &config.filters)
        });
        let contact = setup.run("contact-form", config.contact.enabled, || {
            ContactForm::setup(&mut rt, &config.contact)
        });
        let resume = setup.run("resume", config.resume.enabled, || {
            ResumeDownload::setup(&mut rt, &config.resume)
        });

        let mut app = PortfolioApp {
            config,
            rt,
            store: self.store,
            sink: self.sink,
            theme,
            theme_toggle,
            navigation,
            menu,
            navbar,
            scroll_top,
            reveal,
            skills,
            lazy_images,
            hero,
            typing,
            filters,
            contact,
            resume,
            resize: Debounce::new(RESIZE_DEBOUNCE_MS),
            failures: setup.failures,
            loaded: false,
            last_download: None,
        };
        app.update_observers();
        tracing::debug!(
            "portfolio app ready ({} preset, {} setup failure(s))",
            app.config.preset,
            app.failures.len()
        );
        app
    }
}

struct FeatureSetup {
    mode: SetupMode,
    failures: Vec<SetupFailure>,
}

impl FeatureSetup {
    fn run<T>(
        &mut self,
        feature: &'static str,
        enabled: bool,
        setup: impl FnOnce() -> Result<T>,
    ) -> Option<T> {
        if !enabled {
            tracing::debug!("{feature} disabled");
            return None;
        }
        match setup() {
            Ok(controller) => Some(controller),
            Err(e) => {
                match self.mode {
                    SetupMode::Defensive => tracing::warn!("{feature} skipped: {e}"),
                    SetupMode::Strict => {
                        tracing::error!("{feature} setup failed: {e}");
                        self.failures.push(SetupFailure {
                            feature,
                            message: e.to_string(),
                        });
                    }
                }
                None
            }
        }
    }
}

pub struct PortfolioApp {
    config: SiteConfig,
    rt: Runtime,
    store: Box<dyn PreferenceStore>,
    sink: Box<dyn DownloadSink>,
    theme: ThemeController,
    theme_toggle: Option<ElementId>,
    navigation: Option<Navigation>,
    menu: Option<MobileMenu>,
    navbar: Option<Navbar>,
    scroll_top: Option<ScrollTopButton>,
    reveal: Option<RevealAnimator>,
    skills: Option<SkillBars>,
    lazy_images: Option<LazyImages>,
    hero: Option<HeroEntrance>,
    typing: Option<TypingEffect>,
    filters: Option<ProjectFilters>,
    contact: Option<ContactForm>,
    resume: Option<ResumeDownload>,
    resize: Debounce,
    failures: Vec<SetupFailure>,
    loaded: bool,
    last_download: Option<Download>,
}

impl PortfolioApp {
    pub fn builder(config: SiteConfig) -> PortfolioAppBuilder {
        PortfolioAppBuilder::new(config)
    }

    /// The demo page with default collaborators
    pub fn new(config: SiteConfig) -> Self {
        PortfolioAppBuilder::new(config).build()
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.rt.page
    }

    /// Virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.rt.now()
    }

    pub fn setup_failures(&self) -> &[SetupFailure] {
        &self.failures
    }

    pub fn notifications(&self) -> &[Notification] {
        self.rt.notifications.visible()
    }

    pub fn last_download(&self) -> Option<&Download> {
        self.last_download.as_ref()
    }

    pub fn last_validation(&self) -> Option<&ValidationReport> {
        self.contact.as_ref().and_then(ContactForm::last_report)
    }

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.theme.scheme()
    }

    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }

    pub fn active_section(&self) -> Option<&str> {
        self.navigation.as_ref().and_then(Navigation::active_section)
    }

    pub fn menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(MobileMenu::is_open)
    }

    pub fn contact(&self) -> Option<&ContactForm> {
        self.contact.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// First element matching `selector`
    pub fn find(&self, selector: &str) -> Result<ElementId> {
        self.rt.require("lookup", selector)
    }

    /// Route one event to the controllers. The returned event carries the
    /// dispatch timestamp and whether a controller suppressed the default
    /// action.
    pub fn dispatch(&mut self, mut event: Event) -> Result<Event> {
        event.timestamp = self.rt.now();
        match event.event_type {
            event_types::CLICK => {
                if let Some(target) = event.target {
                    self.on_click(target, &mut event)?;
                }
            }
            event_types::SCROLL => {
                if let EventData::Scroll { y } = event.data {
                    self.rt
                        .animations
                        .cancel_target(folio_animation::AnimationTarget::Viewport);
                    self.rt.page.scroll_to(y);
                    self.on_scroll();
                }
            }
            event_types::RESIZE => {
                if let EventData::Resize { width, height } = event.data {
                    self.rt.page.set_viewport_size(width, height);
                    self.resize.call(self.rt.now());
                }
            }
            event_types::KEY_DOWN => {
                if let (EventData::Key { key }, Some(menu)) = (&event.data, &mut self.menu) {
                    menu.key_down(&mut self.rt, *key);
                }
            }
            event_types::INPUT => {
                if let (Some(target), EventData::Input { value }, Some(contact)) =
                    (event.target, &event.data, &mut self.contact)
                {
                    contact.input(&mut self.rt, target, value);
                }
            }
            event_types::BLUR => {
                if let (Some(target), Some(contact)) = (event.target, &mut self.contact) {
                    contact.blur(&mut self.rt, target);
                }
            }
            event_types::SUBMIT => {
                if let Some(contact) = &mut self.contact {
                    let ours = event.target.map_or(true, |t| t == contact.form());
                    if ours {
                        contact.submit(&mut self.rt);
                        event.prevent_default();
                    }
                }
            }
            event_types::LOAD => self.on_load(),
            event_types::COLOR_SCHEME_CHANGE => {
                if let EventData::ColorScheme { prefers_dark } = event.data {
                    self.on_system_scheme(prefers_dark);
                }
            }
            other => tracing::trace!("unhandled event type {other}"),
        }
        Ok(event)
    }

    pub fn click(&mut self, target: ElementId) -> Result<Event> {
        self.dispatch(Event::click(target))
    }

    pub fn click_selector(&mut self, selector: &str) -> Result<Event> {
        let target = self.find(selector)?;
        self.click(target)
    }

    /// Jump the viewport to `y`, as a user scroll would
    pub fn scroll_to(&mut self, y: f32) -> Result<Event> {
        self.dispatch(Event::scroll(y))
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<Event> {
        self.dispatch(Event::resize(width, height))
    }

    pub fn key_down(&mut self, key: KeyCode) -> Result<Event> {
        self.dispatch(Event::key_down(key))
    }

    pub fn input(&mut self, target: ElementId, value: &str) -> Result<Event> {
        self.dispatch(Event::input(target, value))
    }

    pub fn blur(&mut self, target: ElementId) -> Result<Event> {
        self.dispatch(Event::blur(target))
    }

    /// Submit the contact form
    pub fn submit(&mut self) -> Result<Event> {
        let form = self
            .contact
            .as_ref()
            .map(ContactForm::form)
            .ok_or_else(|| SiteError::MissingElement {
                feature: "contact-form",
                selector: self.config.contact.form_selector.clone(),
            })?;
        self.dispatch(Event::submit(form))
    }

    pub fn load(&mut self) -> Result<Event> {
        self.dispatch(Event::load())
    }

    pub fn system_scheme_changed(&mut self, prefers_dark: bool) -> Result<Event> {
        self.dispatch(Event::color_scheme_change(prefers_dark))
    }

    /// Move the virtual clock forward, one animation frame at a time.
    /// Timers due within a frame run before the frame's animations.
    pub fn advance(&mut self, ms: u64) {
        let end = self.rt.now().saturating_add(ms);
        while self.rt.now() < end {
            let step = FRAME_MS.min(end - self.rt.now());
            let now = self.rt.now() + step;

            for (_, task) in self.rt.timers.advance_to(now) {
                self.run_task(task);
            }

            let report = self.rt.animations.tick(step as f32, &mut self.rt.page);
            if report.scrolled {
                self.on_scroll();
            }

            if self.resize.poll(now) {
                tracing::debug!("resize settled");
                self.on_scroll();
            }
        }
    }

    fn run_task(&mut self, task: Task) {
        tracing::trace!("task {:?} at {}", task, self.rt.now());
        match task {
            Task::ClearThemeTransition => self.theme.clear_transition(&mut self.rt.page),
            Task::TypeNextChar => {
                if let Some(typing) = &mut self.typing {
                    typing.type_next(&mut self.rt);
                }
            }
            Task::HideCard(card) => {
                if let Some(filters) = &mut self.filters {
                    filters.finish_hide(&mut self.rt, card);
                }
            }
            Task::DeliverMessage => {
                if let Some(contact) = &mut self.contact {
                    contact.deliver(&mut self.rt);
                }
            }
            Task::DismissNotification(element) => {
                let Runtime {
                    page,
                    animations,
                    timers,
                    notifications,
                    ..
                } = &mut self.rt;
                notifications.dismiss(page, animations, timers, element);
            }
            Task::RemoveNotification(element) => {
                let Runtime {
                    page,
                    animations,
                    timers,
                    notifications,
                    ..
                } = &mut self.rt;
                notifications.remove(page, animations, timers, element);
            }
            Task::NavRecheck => {
                if let Some(navigation) = &mut self.navigation {
                    navigation.recheck(&mut self.rt);
                }
            }
        }
    }

    fn on_click(&mut self, target: ElementId, event: &mut Event) -> Result<()> {
        if self.theme_toggle.is_some_and(|toggle| self.rt.hit(toggle, target)) {
            self.theme.toggle_theme(&mut self.rt.page, self.store.as_mut())?;
            self.schedule_transition_clear();
        }

        if let Some(menu) = &mut self.menu {
            menu.click(&mut self.rt, target);
        }
        if let Some(navigation) = &mut self.navigation {
            if navigation.click(&mut self.rt, target) {
                event.prevent_default();
            }
        }
        if let Some(scroll_top) = &self.scroll_top {
            scroll_top.click(&mut self.rt, target);
        }
        if let Some(filters) = &mut self.filters {
            filters.click(&mut self.rt, target);
        }
        if let Some(resume) = &self.resume {
            if let Some(download) = resume.click(&mut self.rt, self.sink.as_mut(), target)? {
                self.last_download = Some(download);
                event.prevent_default();
            }
        }
        if let Some(contact) = &mut self.contact {
            if contact.is_submit_click(&self.rt, target) {
                contact.submit(&mut self.rt);
                event.prevent_default();
            }
        }
        Ok(())
    }

    fn on_scroll(&mut self) {
        if let Some(navbar) = &mut self.navbar {
            navbar.scroll(&mut self.rt);
        }
        if let Some(scroll_top) = &mut self.scroll_top {
            scroll_top.scroll(&mut self.rt);
        }
        if let Some(navigation) = &mut self.navigation {
            navigation.scroll(&mut self.rt);
        }
        self.update_observers();
    }

    fn update_observers(&mut self) {
        if let Some(reveal) = &mut self.reveal {
            reveal.update(&mut self.rt);
        }
        if let Some(skills) = &mut self.skills {
            skills.update(&mut self.rt);
        }
        if let Some(lazy_images) = &mut self.lazy_images {
            lazy_images.update(&mut self.rt);
        }
    }

    fn on_load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        if let Some(hero) = &mut self.hero {
            hero.load(&mut self.rt);
        }
        if let Some(typing) = &mut self.typing {
            typing.start(&mut self.rt);
        }
    }

    fn on_system_scheme(&mut self, prefers_dark: bool) {
        if self.theme.on_system_change(&mut self.rt.page, prefers_dark) {
            self.schedule_transition_clear();
        }
    }

    fn schedule_transition_clear(&mut self) {
        if let Some(ms) = self.theme.transition_ms() {
            self.rt.schedule(ms, Task::ClearThemeTransition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    #[test]
    fn test_demo_page_sets_up_every_feature() {
        let mut config = Preset::Classic.config();
        config.setup = SetupMode::Strict;
        config.typing.enabled = true;
        let app = PortfolioApp::new(config);
        assert!(app.setup_failures().is_empty(), "{:?}", app.setup_failures());
        assert_eq!(app.active_section(), Some("home"));
        assert!(!app.is_loaded());
    }

    #[test]
    fn test_theme_toggle_clears_transition_later() {
        let mut app = PortfolioApp::new(SiteConfig::default());
        let body = app.page().body();
        app.click_selector("#theme-toggle").unwrap();
        assert_eq!(app.color_scheme(), ColorScheme::Dark);
        assert_eq!(app.store().get("theme").as_deref(), Some("dark"));
        assert!(app.page().style(body, "transition").is_some());

        app.advance(300);
        assert_eq!(app.page().style(body, "transition"), None);
    }

    #[test]
    fn test_user_scroll_cancels_smooth_scroll() {
        let mut app = PortfolioApp::new(SiteConfig::default());
        let event = app.click_selector(r##".nav-link[href="#contact"]"##).unwrap();
        assert!(event.default_prevented);
        app.advance(100);
        app.scroll_to(50.0).unwrap();
        app.advance(1000);
        assert_eq!(app.page().scroll_y(), 50.0);
    }

    #[test]
    fn test_scroll_easing_comes_from_config() {
        let about = r##".nav-link[href="#about"]"##;
        let mut config = SiteConfig::default();
        config.navigation.scroll_easing = "linear".to_string();
        let mut linear = PortfolioApp::new(config);
        linear.click_selector(about).unwrap();
        linear.advance(150);
        // a quarter of the way to 800 - 70
        assert!((linear.page().scroll_y() - 182.5).abs() < 0.5);

        let mut eased = PortfolioApp::new(SiteConfig::default());
        eased.click_selector(about).unwrap();
        eased.advance(150);
        assert!(eased.page().scroll_y() < 150.0);
    }

    #[test]
    fn test_resize_is_debounced() {
        let mut app = PortfolioApp::new(SiteConfig::default());
        app.resize(1280.0, 2000.0).unwrap();
        app.advance(100);
        app.resize(1280.0, 3000.0).unwrap();
        app.advance(100);
        assert_eq!(app.resize.due_at(), Some(250));
        app.advance(60);
        assert_eq!(app.resize.due_at(), None);
    }

    #[test]
    fn test_load_runs_once() {
        let mut app = PortfolioApp::new(SiteConfig::default());
        app.load().unwrap();
        app.load().unwrap();
        assert!(app.is_loaded());
        let body = app.page().body();
        assert!(app.page().has_class(body, "loaded"));
    }
}
