//! Theme controller
//!
//! Owns the active color scheme for one page. The scheme is mirrored onto
//! the root element as an attribute (`data-color-scheme` by default) plus
//! the palette's custom properties, and persisted in a single preference
//! slot.

use std::collections::BTreeMap;

use folio_core::{Page, PreferenceStore};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::palette::{Color, ColorToken, ColorTokens, ThemePalette};
use crate::scheme::ColorScheme;

/// Theme behaviour, loaded from the `[theme]` table of the site config
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Button that flips the scheme
    pub toggle_selector: String,
    /// Root element attribute carrying the scheme name
    pub attribute: String,
    /// Preference slot holding the chosen scheme
    pub storage_key: String,
    /// Write explicit choices to the preference store
    pub persist: bool,
    /// Follow OS scheme changes until the visitor picks a scheme
    pub follow_system: bool,
    /// Body background transition length in ms; 0 disables it
    pub transition_ms: u64,
    /// Token overrides for the light palette
    pub light: BTreeMap<ColorToken, Color>,
    /// Token overrides for the dark palette
    pub dark: BTreeMap<ColorToken, Color>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            toggle_selector: "#theme-toggle".to_string(),
            attribute: "data-color-scheme".to_string(),
            storage_key: "theme".to_string(),
            persist: true,
            follow_system: true,
            transition_ms: 300,
            light: BTreeMap::new(),
            dark: BTreeMap::new(),
        }
    }
}

pub struct ThemeController {
    settings: ThemeSettings,
    palette: ThemePalette,
    scheme: ColorScheme,
    /// The visitor picked a scheme (now or in an earlier visit)
    explicit: bool,
}

impl ThemeController {
    pub fn new(settings: ThemeSettings) -> Self {
        let palette = ThemePalette {
            light: ColorTokens::light().with_overrides(&settings.light),
            dark: ColorTokens::dark().with_overrides(&settings.dark),
        };
        Self {
            settings,
            palette,
            scheme: ColorScheme::Light,
            explicit: false,
        }
    }

    pub fn settings(&self) -> &ThemeSettings {
        &self.settings
    }

    pub fn palette(&self) -> &ThemePalette {
        &self.palette
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn has_explicit_choice(&self) -> bool {
        self.explicit
    }

    /// Resolve the initial scheme (persisted value, else the system
    /// preference, else light) and apply it without a transition.
    pub fn init(
        &mut self,
        page: &mut Page,
        store: &dyn PreferenceStore,
        system: Option<ColorScheme>,
    ) -> ColorScheme {
        let persisted = if self.settings.persist {
            store
                .get(&self.settings.storage_key)
                .and_then(|raw| match raw.parse::<ColorScheme>() {
                    Ok(scheme) => Some(scheme),
                    Err(e) => {
                        tracing::warn!("ignoring stored theme preference: {e}");
                        None
                    }
                })
        } else {
            None
        };

        self.explicit = persisted.is_some();
        self.scheme = persisted.or(system).unwrap_or_default();
        self.apply(page);
        tracing::debug!(
            "theme initialised to {} (persisted: {:?}, system: {:?})",
            self.scheme,
            persisted,
            system
        );
        self.scheme
    }

    /// Flip the scheme, apply and persist it
    pub fn toggle_theme(
        &mut self,
        page: &mut Page,
        store: &mut dyn PreferenceStore,
    ) -> Result<ColorScheme> {
        let next = self.scheme.toggle();
        self.set_theme(page, store, next)?;
        Ok(next)
    }

    /// Apply an explicit scheme and persist it. Applying the current scheme
    /// again leaves the page unchanged.
    pub fn set_theme(
        &mut self,
        page: &mut Page,
        store: &mut dyn PreferenceStore,
        scheme: ColorScheme,
    ) -> Result<()> {
        let changed = scheme != self.scheme;
        self.scheme = scheme;
        self.explicit = true;
        self.apply(page);
        if changed {
            self.start_transition(page);
        }
        if self.settings.persist {
            store.set(&self.settings.storage_key, scheme.as_str())?;
        }
        tracing::debug!("theme set to {scheme}");
        Ok(())
    }

    /// The OS preference changed. Returns whether the page followed it.
    pub fn on_system_change(&mut self, page: &mut Page, prefers_dark: bool) -> bool {
        if !self.settings.follow_system || self.explicit {
            return false;
        }
        let scheme = ColorScheme::from_prefers_dark(prefers_dark);
        if scheme == self.scheme {
            return false;
        }
        self.scheme = scheme;
        self.apply(page);
        self.start_transition(page);
        tracing::debug!("theme follows system: {scheme}");
        true
    }

    /// Body transition length, `None` when disabled
    pub fn transition_ms(&self) -> Option<u64> {
        (self.settings.transition_ms > 0).then_some(self.settings.transition_ms)
    }

    /// Remove the temporary body transition
    pub fn clear_transition(&self, page: &mut Page) {
        let body = page.body();
        page.remove_style(body, "transition");
    }

    fn start_transition(&self, page: &mut Page) {
        if let Some(ms) = self.transition_ms() {
            let body = page.body();
            page.set_style(
                body,
                "transition",
                &format!("background-color {}s ease", ms as f32 / 1000.0),
            );
        }
    }

    fn apply(&self, page: &mut Page) {
        let root = page.root();
        page.set_attribute(root, &self.settings.attribute, self.scheme.as_str());
        for (name, value) in self.palette.for_scheme(self.scheme).css_variables() {
            page.set_style(root, &name, &value);
        }
    }
}

impl Default for ThemeController {
    fn default() -> Self {
        Self::new(ThemeSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::MemoryStore;

    #[test]
    fn test_init_resolution_order() {
        let mut page = Page::default();

        let mut theme = ThemeController::default();
        let store = MemoryStore::with("theme", "dark");
        assert_eq!(theme.init(&mut page, &store, Some(ColorScheme::Light)), ColorScheme::Dark);
        assert!(theme.has_explicit_choice());

        let mut theme = ThemeController::default();
        assert_eq!(
            theme.init(&mut page, &MemoryStore::new(), Some(ColorScheme::Dark)),
            ColorScheme::Dark
        );
        assert!(!theme.has_explicit_choice());

        let mut theme = ThemeController::default();
        assert_eq!(theme.init(&mut page, &MemoryStore::new(), None), ColorScheme::Light);
    }

    #[test]
    fn test_corrupt_preference_falls_through() {
        let mut page = Page::default();
        let mut theme = ThemeController::default();
        let store = MemoryStore::with("theme", "purple");
        assert_eq!(theme.init(&mut page, &store, Some(ColorScheme::Dark)), ColorScheme::Dark);
        assert!(!theme.has_explicit_choice());
    }

    #[test]
    fn test_apply_writes_attribute_and_variables() {
        let mut page = Page::default();
        let mut store = MemoryStore::new();
        let mut theme = ThemeController::default();
        theme.init(&mut page, &store, None);
        theme.set_theme(&mut page, &mut store, ColorScheme::Dark).unwrap();

        let root = page.root();
        assert_eq!(page.attribute(root, "data-color-scheme"), Some("dark"));
        assert_eq!(page.style(root, "--color-primary"), Some("#32b8c6"));
        assert_eq!(store.get("theme").as_deref(), Some("dark"));

        let body = page.body();
        assert_eq!(page.style(body, "transition"), Some("background-color 0.3s ease"));
        theme.clear_transition(&mut page);
        assert_eq!(page.style(body, "transition"), None);
    }

    #[test]
    fn test_system_changes_respect_explicit_choice() {
        let mut page = Page::default();
        let mut store = MemoryStore::new();
        let mut theme = ThemeController::default();
        theme.init(&mut page, &store, Some(ColorScheme::Light));

        assert!(theme.on_system_change(&mut page, true));
        assert_eq!(theme.scheme(), ColorScheme::Dark);
        assert!(!theme.on_system_change(&mut page, true));

        theme.set_theme(&mut page, &mut store, ColorScheme::Light).unwrap();
        assert!(!theme.on_system_change(&mut page, true));
        assert_eq!(theme.scheme(), ColorScheme::Light);
    }

    #[test]
    fn test_persistence_can_be_disabled() {
        let mut page = Page::default();
        let mut store = MemoryStore::with("theme", "dark");
        let mut theme = ThemeController::new(ThemeSettings {
            persist: false,
            ..ThemeSettings::default()
        });
        assert_eq!(theme.init(&mut page, &store, None), ColorScheme::Light);
        theme.toggle_theme(&mut page, &mut store).unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        theme.toggle_theme(&mut page, &mut store).unwrap();
        // store untouched by the controller
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }
}
