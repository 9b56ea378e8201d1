use folio_core::{FileStore, MemoryStore, Page, PreferenceStore};
use folio_theme::{Color, ColorScheme, ColorToken, ThemeController, ThemeSettings};

fn root_scheme(page: &Page) -> Option<String> {
    page.attribute(page.root(), "data-color-scheme")
        .map(str::to_string)
}

#[test]
fn set_theme_is_idempotent() {
    for scheme in [ColorScheme::Light, ColorScheme::Dark] {
        let mut page = Page::default();
        let mut store = MemoryStore::new();
        let mut theme = ThemeController::default();
        theme.init(&mut page, &store, None);

        theme.set_theme(&mut page, &mut store, scheme).unwrap();
        let once = (root_scheme(&page), store.get("theme"));
        theme.set_theme(&mut page, &mut store, scheme).unwrap();
        let twice = (root_scheme(&page), store.get("theme"));

        assert_eq!(once, twice, "scheme={scheme:?}");
        assert_eq!(once.0.as_deref(), Some(scheme.as_str()));
    }
}

#[test]
fn toggle_twice_restores_root_attribute() {
    for system in [None, Some(ColorScheme::Light), Some(ColorScheme::Dark)] {
        let mut page = Page::default();
        let mut store = MemoryStore::new();
        let mut theme = ThemeController::default();
        theme.init(&mut page, &store, system);
        let before = root_scheme(&page);

        theme.toggle_theme(&mut page, &mut store).unwrap();
        assert_ne!(root_scheme(&page), before);
        theme.toggle_theme(&mut page, &mut store).unwrap();
        assert_eq!(root_scheme(&page), before, "system={system:?}");
    }
}

#[test]
fn choice_survives_a_reload_through_the_file_store() {
    let dir = std::env::temp_dir().join(format!("folio-theme-reload-{}", std::process::id()));
    let path = dir.join("preferences.json");
    let _ = std::fs::remove_dir_all(&dir);

    {
        let mut page = Page::default();
        let mut store = FileStore::open(&path).unwrap();
        let mut theme = ThemeController::default();
        theme.init(&mut page, &store, None);
        theme.set_theme(&mut page, &mut store, ColorScheme::Dark).unwrap();
    }

    let mut page = Page::default();
    let store = FileStore::open(&path).unwrap();
    let mut theme = ThemeController::default();
    assert_eq!(theme.init(&mut page, &store, Some(ColorScheme::Light)), ColorScheme::Dark);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn settings_load_from_toml_with_overrides() {
    let settings: ThemeSettings = toml::from_str(
        r##"
        attribute = "data-theme"
        transition_ms = 0

        [dark]
        primary = "#ff5500"
        "##,
    )
    .unwrap();

    assert_eq!(settings.storage_key, "theme");
    assert!(settings.persist);

    let mut page = Page::default();
    let mut store = MemoryStore::new();
    let mut theme = ThemeController::new(settings);
    theme.init(&mut page, &store, None);
    theme.set_theme(&mut page, &mut store, ColorScheme::Dark).unwrap();

    let root = page.root();
    assert_eq!(page.attribute(root, "data-theme"), Some("dark"));
    assert_eq!(page.style(root, "--color-primary"), Some("#ff5500"));
    assert_eq!(page.style(page.body(), "transition"), None);
    assert_eq!(
        theme.palette().dark.get(ColorToken::Primary),
        Color::from_hex(0xFF5500)
    );
}
