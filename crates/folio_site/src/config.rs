//! Site configuration (`folio.toml`)
//!
//! Every table and field has a default, so a file only needs to name what it
//! changes. A top-level `preset = "<name>"` key selects the base the file is
//! layered over; without it the `classic` preset applies.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use folio_animation::Easing;
use folio_theme::ThemeSettings;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// File name looked up when a directory is given
pub const CONFIG_FILE: &str = "folio.toml";

/// Top-level site configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Preset this configuration was layered over
    pub preset: Preset,
    /// What happens when a feature's markup is missing
    pub setup: SetupMode,
    pub theme: ThemeSettings,
    pub navigation: NavigationConfig,
    pub menu: MenuConfig,
    pub navbar: NavbarConfig,
    pub scroll_top: ScrollTopConfig,
    pub reveal: RevealConfig,
    pub skills: SkillBarConfig,
    pub lazy_images: LazyImageConfig,
    pub hero: HeroConfig,
    pub typing: TypingConfig,
    pub filters: FilterConfig,
    pub contact: ContactConfig,
    pub notifications: NotificationConfig,
    pub resume: ResumeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Preset::Classic.config()
    }
}

/// Missing-markup policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupMode {
    /// Skip the feature and log a warning
    #[default]
    Defensive,
    /// Skip the feature, log an error and record a setup failure
    Strict,
}

/// How the active navigation link is chosen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackingMode {
    /// Last section whose top is at or above `scroll_y + header_offset`
    #[default]
    ScrollOffset,
    /// Sections reported intersecting by an intersection observer
    Intersection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub enabled: bool,
    pub link_selector: String,
    /// Extra in-page anchors that smooth scroll (hero buttons)
    pub anchor_selector: String,
    pub section_selector: String,
    /// Fixed header height subtracted from scroll targets
    pub header_offset: f32,
    pub tracking: TrackingMode,
    /// Intersection tracking threshold
    pub threshold: f32,
    /// Intersection tracking root margin, CSS shorthand
    pub root_margin: String,
    /// Scroll handler rate limit; 0 handles every scroll
    pub throttle_ms: u64,
    pub scroll_duration_ms: u32,
    /// CSS timing function for smooth scrolls
    pub scroll_easing: String,
    pub active_class: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            link_selector: ".nav-link".to_string(),
            anchor_selector: r##".hero-buttons a[href^="#"]"##.to_string(),
            section_selector: "section[id]".to_string(),
            header_offset: 70.0,
            tracking: TrackingMode::ScrollOffset,
            threshold: 0.3,
            root_margin: "-70px 0px -70px 0px".to_string(),
            throttle_ms: 0,
            scroll_duration_ms: 600,
            scroll_easing: "ease-in-out".to_string(),
            active_class: "active".to_string(),
        }
    }
}

impl NavigationConfig {
    /// Parsed `scroll_easing`
    pub fn easing(&self) -> Result<Easing> {
        self.scroll_easing
            .parse::<Easing>()
            .map_err(|e| SiteError::InvalidConfig(format!("navigation.scroll_easing: {e}")))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub enabled: bool,
    pub hamburger_selector: String,
    pub menu_selector: String,
    pub link_selector: String,
    pub open_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hamburger_selector: "#hamburger".to_string(),
            menu_selector: "#nav-menu".to_string(),
            link_selector: ".nav-link".to_string(),
            open_class: "active".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    pub enabled: bool,
    pub selector: String,
    /// `scrolled` class above this offset
    pub scrolled_threshold: f32,
    /// Hide while scrolling down past this offset
    pub hide_threshold: f32,
    pub hide_on_scroll: bool,
    pub scrolled_class: String,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: "#navbar".to_string(),
            scrolled_threshold: 100.0,
            hide_threshold: 200.0,
            hide_on_scroll: true,
            scrolled_class: "scrolled".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollTopConfig {
    pub enabled: bool,
    /// Button visible beyond this offset
    pub show_after: f32,
    pub class: String,
}

impl Default for ScrollTopConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            show_after: 500.0,
            class: "scroll-to-top".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub enabled: bool,
    pub selector: String,
    pub threshold: f32,
    pub root_margin: String,
    pub class: String,
    /// Reveal each element only the first time it enters the viewport
    pub once: bool,
    pub duration_ms: u32,
    /// Initial downward offset in px
    pub distance: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".section-header, .about-content, .skill-category, .project-card, .timeline-item, .contact-content".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            class: "fade-in-up".to_string(),
            once: true,
            duration_ms: 600,
            distance: 30.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillBarConfig {
    pub enabled: bool,
    pub selector: String,
    pub threshold: f32,
    /// Attribute holding the target percentage; `--progress` is the fallback
    pub attribute: String,
    pub delay_ms: u32,
    pub duration_ms: u32,
    /// Animate each bar only on its first intersection
    pub once: bool,
}

impl Default for SkillBarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".skill-progress".to_string(),
            threshold: 0.5,
            attribute: "data-progress".to_string(),
            delay_ms: 200,
            duration_ms: 1000,
            once: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyImageConfig {
    pub enabled: bool,
    pub selector: String,
}

impl Default for LazyImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: "img[data-src]".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub enabled: bool,
    pub selector: String,
    pub stagger_ms: u32,
    pub duration_ms: u32,
    pub distance: f32,
    /// Class added to `body` once the page has loaded
    pub loaded_class: String,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".hero-title, .hero-subtitle, .hero-tagline, .hero-description, .hero-buttons"
                .to_string(),
            stagger_ms: 200,
            duration_ms: 600,
            distance: 30.0,
            loaded_class: "loaded".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub enabled: bool,
    pub selector: String,
    pub start_delay_ms: u64,
    pub char_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            selector: ".hero-title .text-highlight".to_string(),
            start_delay_ms: 1000,
            char_ms: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled: bool,
    pub button_selector: String,
    pub card_selector: String,
    pub hide_after_ms: u64,
    pub animation_ms: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            button_selector: ".filter-btn".to_string(),
            card_selector: ".project-card".to_string(),
            hide_after_ms: 300,
            animation_ms: 300,
        }
    }
}

/// Where validation errors are shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorDisplay {
    /// Text next to each field
    Inline,
    /// One aggregate error notification
    Banner,
    #[default]
    Both,
}

impl ErrorDisplay {
    pub fn inline(self) -> bool {
        matches!(self, ErrorDisplay::Inline | ErrorDisplay::Both)
    }

    pub fn banner(self) -> bool {
        matches!(self, ErrorDisplay::Banner | ErrorDisplay::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorDisplay::Inline => "inline",
            ErrorDisplay::Banner => "banner",
            ErrorDisplay::Both => "both",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub enabled: bool,
    pub form_selector: String,
    pub min_name: usize,
    pub min_subject: usize,
    pub min_message: usize,
    /// Simulated network latency
    pub send_delay_ms: u64,
    pub error_display: ErrorDisplay,
    pub sending_label: String,
    pub success_message: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            form_selector: "#contact-form".to_string(),
            min_name: 2,
            min_subject: 5,
            min_message: 10,
            send_delay_ms: 2000,
            error_display: ErrorDisplay::Both,
            sending_label: "Sending...".to_string(),
            success_message: "Message sent successfully! I'll get back to you soon.".to_string(),
        }
    }
}

/// What happens to visible notifications when a new one appears
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPolicy {
    /// The new notification replaces the visible one
    #[default]
    Single,
    /// Notifications stack up to `max_visible`, oldest dropped first
    Stack,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub policy: NotificationPolicy,
    pub max_visible: usize,
    pub duration_ms: u64,
    /// Slide-out time before the element is removed
    pub exit_ms: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            policy: NotificationPolicy::Single,
            max_visible: 2,
            duration_ms: 5000,
            exit_ms: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeConfig {
    pub enabled: bool,
    pub trigger_selector: String,
    /// File name without extension
    pub filename: String,
    pub format: crate::resume::DocumentFormat,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_selector: "#download-resume".to_string(),
            filename: "resume".to_string(),
            format: crate::resume::DocumentFormat::Text,
        }
    }
}

/// Named configurations reproducing the known page variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Scroll-offset tracking, throttled scroll, inline and banner errors
    #[default]
    Classic,
    /// Observer-driven tracking, repeatable skill bars, strict setup
    Observer,
    /// Stacked notifications and inline-only errors
    Stacked,
    /// Core behaviour only, no decorative effects
    Minimal,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Classic,
        Preset::Observer,
        Preset::Stacked,
        Preset::Minimal,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Observer => "observer",
            Preset::Stacked => "stacked",
            Preset::Minimal => "minimal",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Classic => "scroll-offset nav tracking, throttled scroll handler, inline + banner errors",
            Preset::Observer => "intersection-observer nav tracking, repeatable skill bars, strict setup",
            Preset::Stacked => "stacked notifications, inline errors, shorter send delay",
            Preset::Minimal => "theme, navigation, menu and contact form only",
        }
    }

    pub fn config(self) -> SiteConfig {
        let mut config = SiteConfig {
            preset: self,
            setup: SetupMode::Defensive,
            theme: ThemeSettings::default(),
            navigation: NavigationConfig::default(),
            menu: MenuConfig::default(),
            navbar: NavbarConfig::default(),
            scroll_top: ScrollTopConfig::default(),
            reveal: RevealConfig::default(),
            skills: SkillBarConfig::default(),
            lazy_images: LazyImageConfig::default(),
            hero: HeroConfig::default(),
            typing: TypingConfig::default(),
            filters: FilterConfig::default(),
            contact: ContactConfig::default(),
            notifications: NotificationConfig::default(),
            resume: ResumeConfig::default(),
        };

        match self {
            Preset::Classic => {
                config.navigation.throttle_ms = 100;
            }
            Preset::Observer => {
                config.setup = SetupMode::Strict;
                config.theme.persist = false;
                config.navigation.tracking = TrackingMode::Intersection;
                config.skills.once = false;
                config.contact.min_subject = 3;
                config.contact.error_display = ErrorDisplay::Banner;
            }
            Preset::Stacked => {
                config.notifications.policy = NotificationPolicy::Stack;
                config.notifications.duration_ms = 3000;
                config.contact.error_display = ErrorDisplay::Inline;
                config.contact.send_delay_ms = 1500;
                config.contact.min_subject = 3;
                config.navigation.throttle_ms = 50;
            }
            Preset::Minimal => {
                config.theme.transition_ms = 0;
                config.navbar.enabled = false;
                config.scroll_top.enabled = false;
                config.reveal.enabled = false;
                config.skills.enabled = false;
                config.lazy_images.enabled = false;
                config.hero.enabled = false;
                config.filters.enabled = false;
                config.resume.enabled = false;
                config.contact.send_delay_ms = 1200;
            }
        }
        config
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Preset {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SiteError::UnknownPreset(s.to_string()))
    }
}

impl SiteConfig {
    pub fn preset(preset: Preset) -> Self {
        preset.config()
    }

    /// Parse a configuration layered over its declared preset
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let overrides: toml::Table = input.parse()?;

        let preset = match overrides.get("preset") {
            Some(toml::Value::String(name)) => name.parse::<Preset>()?,
            Some(other) => {
                return Err(SiteError::InvalidConfig(format!(
                    "`preset` must be a string, got {}",
                    other.type_str()
                )))
            }
            None => Preset::default(),
        };

        let mut base = toml::Table::try_from(preset.config())?;
        merge_tables(&mut base, overrides);
        let config: SiteConfig = toml::Value::Table(base).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, or from `folio.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };
        let content =
            fs::read_to_string(&config_path).map_err(|e| SiteError::io(&config_path, e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            SiteError::ConfigSyntax(source) => SiteError::ConfigParse {
                path: config_path.clone(),
                source,
            },
            other => other,
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values no page could work with
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f32| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(SiteError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )))
            }
        };
        unit("navigation.threshold", self.navigation.threshold)?;
        unit("reveal.threshold", self.reveal.threshold)?;
        unit("skills.threshold", self.skills.threshold)?;

        for (name, margin) in [
            ("navigation.root_margin", &self.navigation.root_margin),
            ("reveal.root_margin", &self.reveal.root_margin),
        ] {
            margin
                .parse::<folio_core::RootMargin>()
                .map_err(|e| SiteError::InvalidConfig(format!("{name}: {e}")))?;
        }

        self.navigation.easing()?;

        if self.notifications.policy == NotificationPolicy::Stack
            && self.notifications.max_visible == 0
        {
            return Err(SiteError::InvalidConfig(
                "notifications.max_visible must be at least 1 when stacking".to_string(),
            ));
        }
        if self.resume.filename.trim().is_empty() {
            return Err(SiteError::InvalidConfig(
                "resume.filename must not be empty".to_string(),
            ));
        }
        crate::resume::check_filename(&self.resume.filename)
            .map_err(|e| SiteError::InvalidConfig(format!("resume.filename: {e}")))?;
        Ok(())
    }
}

/// Recursively overlay `overrides` onto `base`
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_round_trip_through_toml() {
        for preset in Preset::ALL {
            let config = preset.config();
            let text = config.to_toml().unwrap();
            let parsed = SiteConfig::from_toml_str(&text).unwrap();
            assert_eq!(parsed, config, "preset={preset}");
        }
    }

    #[test]
    fn test_partial_file_layers_over_preset() {
        let config = SiteConfig::from_toml_str(
            r#"
            preset = "observer"

            [contact]
            send_delay_ms = 1200

            [navigation]
            header_offset = 80.0
            "#,
        )
        .unwrap();

        assert_eq!(config.preset, Preset::Observer);
        assert_eq!(config.contact.send_delay_ms, 1200);
        assert_eq!(config.contact.min_subject, 3);
        assert_eq!(config.navigation.header_offset, 80.0);
        assert_eq!(config.navigation.tracking, TrackingMode::Intersection);
        assert_eq!(config.setup, SetupMode::Strict);
    }

    #[test]
    fn test_empty_file_is_classic() {
        assert_eq!(SiteConfig::from_toml_str("").unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            SiteConfig::from_toml_str("preset = \"fancy\""),
            Err(SiteError::UnknownPreset(_))
        ));
        assert!(matches!(
            SiteConfig::from_toml_str("[reveal]\nthreshold = 1.5"),
            Err(SiteError::InvalidConfig(_))
        ));
        assert!(matches!(
            SiteConfig::from_toml_str("[navigation]\nroot_margin = \"wide\""),
            Err(SiteError::InvalidConfig(_))
        ));
        assert!(matches!(
            SiteConfig::from_toml_str("[contact\n"),
            Err(SiteError::ConfigSyntax(_))
        ));
    }

    #[test]
    fn test_scroll_easing_parses_css_timing_functions() {
        let input = "[navigation]\nscroll_easing = \"cubic-bezier(0.4, 0, 0.2, 1)\"";
        let config = SiteConfig::from_toml_str(input).unwrap();
        assert_eq!(
            config.navigation.easing().unwrap(),
            Easing::CubicBezier(0.4, 0.0, 0.2, 1.0)
        );
        assert_eq!(
            SiteConfig::default().navigation.easing().unwrap(),
            Easing::CSS_EASE_IN_OUT
        );
        assert!(matches!(
            SiteConfig::from_toml_str("[navigation]\nscroll_easing = \"bounce\""),
            Err(SiteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_resume_filename_must_be_plain() {
        assert!(matches!(
            SiteConfig::from_toml_str("[resume]\nfilename = \"../cv\""),
            Err(SiteError::InvalidConfig(_))
        ));
        assert!(SiteConfig::from_toml_str("[resume]\nfilename = \"cv-2024\"").is_ok());
    }

    #[test]
    fn test_out_of_range_exit_time_is_rejected() {
        let config = SiteConfig::from_toml_str("[notifications]\nexit_ms = 450").unwrap();
        assert_eq!(config.notifications.exit_ms, 450);
        assert!(SiteConfig::from_toml_str("[notifications]\nexit_ms = 5000000000").is_err());
        assert!(SiteConfig::from_toml_str("[notifications]\nexit_ms = -1").is_err());
    }

    #[test]
    fn test_preset_names_parse() {
        assert_eq!("Stacked".parse::<Preset>().unwrap(), Preset::Stacked);
        assert!("other".parse::<Preset>().is_err());
    }
}
