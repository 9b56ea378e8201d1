//! In-page navigation
//!
//! Smooth scrolling to `href="#id"` anchors and active-link tracking.
//! Tracking either compares section tops against a reference line below the
//! fixed header, or follows an intersection observer over the sections.

use folio_core::{ElementId, IntersectionObserver, ObserverOptions, RootMargin, Throttle, TimerId};

use crate::config::{NavigationConfig, TrackingMode};
use crate::context::{Runtime, Task};
use crate::error::{Result, SiteError};

struct Section {
    element: ElementId,
    id: String,
}

enum Tracker {
    ScrollOffset,
    Intersection(IntersectionObserver),
}

pub struct Navigation {
    links: Vec<ElementId>,
    anchors: Vec<ElementId>,
    sections: Vec<Section>,
    tracker: Tracker,
    throttle: Option<Throttle>,
    recheck: Option<TimerId>,
    header_offset: f32,
    active_class: String,
    active: Option<String>,
}

impl Navigation {
    pub fn setup(rt: &mut Runtime, config: &NavigationConfig) -> Result<Self> {
        let links = rt.select_all(&config.link_selector)?;
        let anchors = rt.select_all(&config.anchor_selector)?;
        let sections: Vec<Section> = rt
            .select_all(&config.section_selector)?
            .into_iter()
            .filter_map(|element| {
                rt.page.get(element).and_then(|e| e.dom_id()).map(|id| Section {
                    element,
                    id: id.to_string(),
                })
            })
            .collect();

        let tracker = match config.tracking {
            TrackingMode::ScrollOffset => Tracker::ScrollOffset,
            TrackingMode::Intersection => {
                let margin = config
                    .root_margin
                    .parse::<RootMargin>()
                    .map_err(|e| SiteError::InvalidConfig(format!("navigation.root_margin: {e}")))?;
                let mut observer =
                    IntersectionObserver::new(ObserverOptions::new(config.threshold, margin));
                for section in &sections {
                    observer.observe(section.element);
                }
                Tracker::Intersection(observer)
            }
        };

        tracing::debug!(
            "navigation: {} links, {} anchors, {} sections, {:?} tracking",
            links.len(),
            anchors.len(),
            sections.len(),
            config.tracking
        );

        let mut nav = Self {
            links,
            anchors,
            sections,
            tracker,
            throttle: (config.throttle_ms > 0).then(|| Throttle::new(config.throttle_ms)),
            recheck: None,
            header_offset: config.header_offset,
            active_class: config.active_class.clone(),
            active: None,
        };
        nav.update_active(rt);
        Ok(nav)
    }

    /// Id of the section whose link is active
    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Smooth scroll for a click on a nav link or anchor button. Returns
    /// whether the click was handled (the default jump is suppressed).
    pub fn click(&mut self, rt: &mut Runtime, target: ElementId) -> bool {
        let Some(source) = self
            .links
            .iter()
            .chain(self.anchors.iter())
            .copied()
            .find(|link| rt.hit(*link, target))
        else {
            return false;
        };

        let Some(href) = rt.page.attribute(source, "href") else {
            return false;
        };
        let Some(fragment) = href.strip_prefix('#').filter(|f| !f.is_empty()) else {
            return false;
        };
        let Some(section) = rt.page.get_by_id(fragment) else {
            tracing::debug!("navigation target #{fragment} not on page");
            return true;
        };
        let top = rt.page.rect(section).map_or(0.0, |r| r.top);
        rt.smooth_scroll_to(top - self.header_offset);
        true
    }

    /// The viewport scrolled
    pub fn scroll(&mut self, rt: &mut Runtime) {
        let now = rt.now();
        if let Some(throttle) = &mut self.throttle {
            if !throttle.try_acquire(now) {
                // the last scroll of a burst still gets a recompute
                if self.recheck.map_or(true, |id| !rt.timers.is_pending(id)) {
                    let limit = throttle.limit_ms();
                    self.recheck = Some(rt.schedule(limit, Task::NavRecheck));
                }
                return;
            }
        }
        self.update_active(rt);
    }

    /// Trailing recompute scheduled by a throttled scroll
    pub fn recheck(&mut self, rt: &mut Runtime) {
        self.recheck = None;
        self.update_active(rt);
    }

    /// Recompute the active link for the current viewport
    pub fn update_active(&mut self, rt: &mut Runtime) {
        let next = match &mut self.tracker {
            Tracker::ScrollOffset => {
                let reference = rt.page.scroll_y() + self.header_offset;
                self.sections
                    .iter()
                    .rev()
                    .find(|s| rt.page.rect(s.element).is_some_and(|r| r.top <= reference))
                    .map(|s| s.id.clone())
            }
            Tracker::Intersection(observer) => {
                // the last section to start intersecting wins
                let entered = observer
                    .check(&rt.page)
                    .into_iter()
                    .rev()
                    .find(|entry| entry.is_intersecting);
                match entered {
                    Some(entry) => self
                        .sections
                        .iter()
                        .find(|s| s.element == entry.target)
                        .map(|s| s.id.clone()),
                    None => return,
                }
            }
        };

        match next {
            Some(id) => self.set_active(rt, &id),
            // reference line is above the first section
            None if matches!(self.tracker, Tracker::ScrollOffset) => self.clear_active(rt),
            None => {}
        }
    }

    fn clear_active(&mut self, rt: &mut Runtime) {
        if self.active.take().is_none() {
            return;
        }
        for link in &self.links {
            rt.page.remove_class(*link, &self.active_class);
        }
        tracing::debug!("active section cleared");
    }

    fn set_active(&mut self, rt: &mut Runtime, id: &str) {
        if self.active.as_deref() == Some(id) {
            return;
        }
        let href = format!("#{id}");
        for link in &self.links {
            if rt.page.attribute(*link, "href") == Some(href.as_str()) {
                rt.page.add_class(*link, &self.active_class);
            } else {
                rt.page.remove_class(*link, &self.active_class);
            }
        }
        tracing::debug!("active section: {id}");
        self.active = Some(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use folio_core::Page;

    fn runtime() -> Runtime {
        let mut page = Page::new(1280.0, 800.0);
        page.set_document_height(3000.0);
        let body = page.body();
        let nav = page.append(body, "nav").finish();
        for id in ["home", "about", "contact"] {
            page.append(nav, "a")
                .class("nav-link")
                .attr("href", &format!("#{id}"))
                .finish();
        }
        page.append(body, "section").id("home").rect(0.0, 1000.0).finish();
        page.append(body, "section").id("about").rect(1000.0, 1000.0).finish();
        page.append(body, "section").id("contact").rect(2000.0, 1000.0).finish();
        Runtime::new(page, NotificationConfig::default(), 600)
    }

    fn link(rt: &Runtime, id: &str) -> ElementId {
        rt.page
            .query_selector(&format!(r##".nav-link[href="#{id}"]"##))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_scroll_offset_tracking_picks_last_section_above_reference() {
        let mut rt = runtime();
        let mut nav = Navigation::setup(&mut rt, &NavigationConfig::default()).unwrap();
        assert_eq!(nav.active_section(), Some("home"));

        rt.page.scroll_to(929.0);
        nav.scroll(&mut rt);
        assert_eq!(nav.active_section(), Some("home"));

        rt.page.scroll_to(930.0);
        nav.scroll(&mut rt);
        assert_eq!(nav.active_section(), Some("about"));
        assert!(rt.page.has_class(link(&rt, "about"), "active"));
        assert!(!rt.page.has_class(link(&rt, "home"), "active"));
    }

    #[test]
    fn test_no_link_is_active_above_the_first_section() {
        let mut page = Page::new(1280.0, 800.0);
        page.set_document_height(3000.0);
        let body = page.body();
        for id in ["about", "contact"] {
            page.append(body, "a")
                .class("nav-link")
                .attr("href", &format!("#{id}"))
                .finish();
        }
        page.append(body, "div").class("intro").rect(0.0, 600.0).finish();
        page.append(body, "section").id("about").rect(600.0, 1000.0).finish();
        page.append(body, "section").id("contact").rect(1600.0, 1000.0).finish();
        let mut rt = Runtime::new(page, NotificationConfig::default(), 600);
        let config = NavigationConfig {
            throttle_ms: 0,
            ..NavigationConfig::default()
        };
        let mut nav = Navigation::setup(&mut rt, &config).unwrap();
        assert_eq!(nav.active_section(), None);

        rt.page.scroll_to(1000.0);
        nav.scroll(&mut rt);
        assert_eq!(nav.active_section(), Some("about"));
        assert!(rt.page.has_class(link(&rt, "about"), "active"));

        rt.page.scroll_to(0.0);
        nav.scroll(&mut rt);
        assert_eq!(nav.active_section(), None);
        assert!(!rt.page.has_class(link(&rt, "about"), "active"));
        assert!(!rt.page.has_class(link(&rt, "contact"), "active"));
    }

    #[test]
    fn test_click_scrolls_below_header() {
        let mut rt = runtime();
        let mut nav = Navigation::setup(&mut rt, &NavigationConfig::default()).unwrap();
        let about = link(&rt, "about");
        assert!(nav.click(&mut rt, about));
        rt.animations.tick(600.0, &mut rt.page);
        assert_eq!(rt.page.scroll_y(), 930.0);
    }

    #[test]
    fn test_throttled_scroll_rechecks_after_window() {
        let mut rt = runtime();
        let config = NavigationConfig {
            throttle_ms: 100,
            ..NavigationConfig::default()
        };
        let mut nav = Navigation::setup(&mut rt, &config).unwrap();

        rt.page.scroll_to(10.0);
        nav.scroll(&mut rt);
        rt.page.scroll_to(2000.0);
        nav.scroll(&mut rt);
        // second scroll fell inside the window
        assert_eq!(nav.active_section(), Some("home"));

        let due = rt.timers.advance_to(100);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].1, Task::NavRecheck);
        nav.recheck(&mut rt);
        assert_eq!(nav.active_section(), Some("contact"));
    }

    #[test]
    fn test_intersection_tracking() {
        let mut rt = runtime();
        let config = NavigationConfig {
            tracking: TrackingMode::Intersection,
            ..NavigationConfig::default()
        };
        let mut nav = Navigation::setup(&mut rt, &config).unwrap();
        assert_eq!(nav.active_section(), Some("home"));

        rt.page.scroll_to(1100.0);
        nav.scroll(&mut rt);
        assert_eq!(nav.active_section(), Some("about"));
    }
}
