//! End-to-end behaviour of the portfolio app on the demo page

use folio_core::{KeyCode, MemoryStore, Page, PreferenceStore};
use folio_site::{
    DocumentFormat, Field, PortfolioApp, Preset, Scenario, SetupMode, Severity, SiteConfig,
    RESUME_TEMPLATE,
};
use folio_theme::ColorScheme;

fn app() -> PortfolioApp {
    PortfolioApp::new(SiteConfig::default())
}

fn fill(app: &mut PortfolioApp, name: &str, email: &str, subject: &str, message: &str) {
    for (field, value) in [
        ("name", name),
        ("email", email),
        ("subject", subject),
        ("message", message),
    ] {
        let control = app.find(&format!(r#"[name="{field}"]"#)).unwrap();
        app.input(control, value).unwrap();
    }
}

#[test]
fn valid_message_is_sent_after_the_delay() {
    let mut app = app();
    fill(&mut app, "Al", "a@b.com", "Hi there", "This is long enough.");
    let button = app.find(r#"#contact-form button[type="submit"]"#).unwrap();

    let event = app.click(button).unwrap();
    assert!(event.default_prevented);
    assert!(app.last_validation().unwrap().is_valid());
    assert_eq!(app.page().text(button), Some("Sending..."));
    assert_eq!(app.page().attribute(button, "disabled"), Some(""));
    assert!(app.notifications().is_empty());

    // a second click while sending is ignored
    app.click(button).unwrap();
    app.advance(1999);
    assert!(app.contact().unwrap().is_sending());

    app.advance(1);
    let latest = app.notifications().last().unwrap();
    assert_eq!(latest.severity, Severity::Success);
    assert!(latest.message.starts_with("Message sent successfully"));
    assert_eq!(app.page().text(button), Some("Send Message"));
    assert_eq!(app.page().attribute(button, "disabled"), None);
    let name = app.find(r#"[name="name"]"#).unwrap();
    assert_eq!(app.page().value(name), "");
}

#[test]
fn every_violated_rule_is_reported() {
    let mut app = app();
    fill(&mut app, "A", "bad", "", "short");
    app.submit().unwrap();

    let report = app.last_validation().unwrap();
    assert_eq!(report.errors.len(), 4);
    assert_eq!(
        report.error_for(Field::Name),
        Some("Name must be at least 2 characters")
    );
    assert_eq!(
        report.error_for(Field::Email),
        Some("Please enter a valid email address")
    );
    assert_eq!(
        report.error_for(Field::Subject),
        Some("Subject must be at least 5 characters")
    );
    assert_eq!(
        report.error_for(Field::Message),
        Some("Message must be at least 10 characters")
    );

    // inline and banner
    let slot = app.find(r#"[data-error-for="email"]"#).unwrap();
    assert_eq!(app.page().text(slot), Some("Please enter a valid email address"));
    let email = app.find(r#"[name="email"]"#).unwrap();
    assert_eq!(app.page().attribute(email, "aria-invalid"), Some("true"));
    let banner = app.notifications().last().unwrap();
    assert_eq!(banner.severity, Severity::Error);
    assert_eq!(banner.message, "Please fill in all fields");

    // fixing one field clears only its error
    app.input(email, "alex@example.com").unwrap();
    assert_eq!(app.page().text(slot), Some(""));
    assert!(!app.page().has_class(email, "error"));
    let name = app.find(r#"[name="name"]"#).unwrap();
    assert!(app.page().has_class(name, "error"));
}

#[test]
fn subject_minimum_follows_the_preset() {
    for (preset, valid) in [(Preset::Classic, false), (Preset::Observer, true)] {
        let mut app = PortfolioApp::new(preset.config());
        fill(&mut app, "Alex", "alex@example.com", "Hey", "Long enough message");
        app.submit().unwrap();
        assert_eq!(app.last_validation().unwrap().is_valid(), valid, "{preset}");
    }
}

#[test]
fn resume_download_is_the_template() {
    let mut app = app();
    app.click_selector("#download-resume").unwrap();

    let download = app.last_download().unwrap();
    assert_eq!(download.filename, "resume.txt");
    assert_eq!(download.mime, DocumentFormat::Text.mime());
    assert_eq!(download.text(), Some(RESUME_TEMPLATE));
    let latest = app.notifications().last().unwrap();
    assert_eq!(latest.message, "Resume downloaded successfully!");
    assert_eq!(latest.severity, Severity::Success);
}

#[test]
fn navbar_scrolled_styling_tracks_thresholds() {
    let mut app = app();
    let navbar = app.find("#navbar").unwrap();

    app.scroll_to(150.0).unwrap();
    assert!(app.page().has_class(navbar, "scrolled"));
    assert_eq!(app.page().style(navbar, "transform"), Some("translateY(0)"));

    app.scroll_to(400.0).unwrap();
    assert_eq!(app.page().style(navbar, "transform"), Some("translateY(-100%)"));

    app.scroll_to(300.0).unwrap();
    assert_eq!(app.page().style(navbar, "transform"), Some("translateY(0)"));

    app.scroll_to(50.0).unwrap();
    assert!(!app.page().has_class(navbar, "scrolled"));
}

#[test]
fn active_link_follows_scroll_position() {
    let mut app = app();
    let skills = app.find(r##".nav-link[href="#skills"]"##).unwrap();
    let projects = app.find(r##".nav-link[href="#projects"]"##).unwrap();
    assert_eq!(app.active_section(), Some("home"));

    app.scroll_to(1750.0).unwrap();
    assert_eq!(app.active_section(), Some("skills"));
    assert!(app.page().has_class(skills, "active"));

    // inside the throttle window: applied by the trailing recheck
    app.scroll_to(2800.0).unwrap();
    assert_eq!(app.active_section(), Some("skills"));
    app.advance(100);
    assert_eq!(app.active_section(), Some("projects"));
    assert!(app.page().has_class(projects, "active"));
    assert!(!app.page().has_class(skills, "active"));
}

#[test]
fn intersection_tracking_preset() {
    let mut app = PortfolioApp::new(Preset::Observer.config());
    assert_eq!(app.active_section(), Some("home"));
    app.scroll_to(2800.0).unwrap();
    assert_eq!(app.active_section(), Some("projects"));
}

fn page_with_intro_block() -> Page {
    let mut page = Page::new(1280.0, 800.0);
    page.set_document_height(3000.0);
    let body = page.body();
    let nav = page.append(body, "nav").id("navbar").finish();
    for id in ["about", "contact"] {
        page.append(nav, "a")
            .class("nav-link")
            .attr("href", &format!("#{id}"))
            .finish();
    }
    page.append(body, "div").class("intro").rect(0.0, 600.0).finish();
    page.append(body, "section").id("about").rect(600.0, 1000.0).finish();
    page.append(body, "section").id("contact").rect(1600.0, 1400.0).finish();
    page
}

#[test]
fn no_link_is_active_above_the_first_section() {
    let mut config = SiteConfig::default();
    config.navigation.throttle_ms = 0;
    let mut app = PortfolioApp::builder(config)
        .page(page_with_intro_block())
        .build();
    let about = app.find(r##".nav-link[href="#about"]"##).unwrap();
    assert_eq!(app.active_section(), None);

    app.scroll_to(1000.0).unwrap();
    assert_eq!(app.active_section(), Some("about"));
    assert!(app.page().has_class(about, "active"));

    app.scroll_to(0.0).unwrap();
    assert_eq!(app.active_section(), None);
    assert!(!app.page().has_class(about, "active"));
}

#[test]
fn nav_click_scrolls_below_the_header() {
    let mut app = app();
    let event = app.click_selector(r##".hero-buttons a[href="#contact"]"##).unwrap();
    assert!(event.default_prevented);
    app.advance(1000);
    assert_eq!(app.page().scroll_y(), 4900.0 - 70.0);
    assert_eq!(app.active_section(), Some("contact"));
}

#[test]
fn mobile_menu_opens_and_closes() {
    let mut app = app();
    let hamburger = app.find("#hamburger").unwrap();
    let menu = app.find("#nav-menu").unwrap();

    app.click(hamburger).unwrap();
    assert!(app.menu_open());
    assert!(app.page().has_class(menu, "active"));
    assert_eq!(app.page().attribute(hamburger, "aria-expanded"), Some("true"));

    app.click_selector(r##".nav-link[href="#about"]"##).unwrap();
    assert!(!app.menu_open());

    app.click(hamburger).unwrap();
    app.key_down(KeyCode::ESCAPE).unwrap();
    assert!(!app.menu_open());
    assert!(!app.page().has_class(hamburger, "active"));

    app.click(hamburger).unwrap();
    app.click_selector("#about").unwrap();
    assert!(!app.menu_open());
}

#[test]
fn project_filter_hides_other_categories() {
    let mut app = app();
    app.click_selector(r#".filter-btn[data-filter="mobile"]"#).unwrap();
    let web = app.find(r#".project-card[data-category="web"]"#).unwrap();
    let mobile = app.find(r#".project-card[data-category="mobile"]"#).unwrap();

    assert!(app.page().has_class(web, "filtered-out"));
    app.advance(300);
    assert_eq!(app.page().style(web, "display"), Some("none"));
    assert_eq!(app.page().style(mobile, "display"), Some("block"));

    let active = app.find(".filter-btn.active").unwrap();
    assert_eq!(app.page().attribute(active, "data-filter"), Some("mobile"));
}

#[test]
fn theme_choice_persists_and_beats_the_system() {
    let store = MemoryStore::with("theme", "dark");
    let mut app = PortfolioApp::builder(SiteConfig::default())
        .store(store)
        .system_scheme(Some(ColorScheme::Light))
        .build();
    assert_eq!(app.color_scheme(), ColorScheme::Dark);
    let root = app.page().root();
    assert_eq!(app.page().attribute(root, "data-color-scheme"), Some("dark"));

    app.system_scheme_changed(false).unwrap();
    assert_eq!(app.color_scheme(), ColorScheme::Dark);

    app.click_selector("#theme-toggle").unwrap();
    assert_eq!(app.color_scheme(), ColorScheme::Light);
    assert_eq!(app.store().get("theme").as_deref(), Some("light"));
}

#[test]
fn system_scheme_is_followed_without_a_choice() {
    let mut app = app();
    assert_eq!(app.color_scheme(), ColorScheme::Light);
    app.system_scheme_changed(true).unwrap();
    assert_eq!(app.color_scheme(), ColorScheme::Dark);
}

fn page_without_contact_form() -> Page {
    let mut page = Page::new(1280.0, 800.0);
    page.set_document_height(2000.0);
    let body = page.body();
    page.append(body, "nav").id("navbar").finish();
    page.append(body, "button").id("theme-toggle").finish();
    page.append(body, "section").id("home").rect(0.0, 2000.0).finish();
    page
}

#[test]
fn strict_setup_records_missing_features() {
    let mut config = SiteConfig::default();
    config.setup = SetupMode::Strict;
    let mut app = PortfolioApp::builder(config)
        .page(page_without_contact_form())
        .build();

    let failed: Vec<&str> = app.setup_failures().iter().map(|f| f.feature).collect();
    assert!(failed.contains(&"contact-form"));
    assert!(failed.contains(&"mobile-menu"));
    assert!(failed.contains(&"resume"));
    assert!(!failed.contains(&"navbar"));

    // the rest of the page still works
    app.click_selector("#theme-toggle").unwrap();
    assert_eq!(app.color_scheme(), ColorScheme::Dark);
    assert!(app.submit().is_err());
}

#[test]
fn defensive_setup_skips_quietly() {
    let app = PortfolioApp::builder(SiteConfig::default())
        .page(page_without_contact_form())
        .build();
    assert!(app.setup_failures().is_empty());
    assert!(app.contact().is_none());
}

#[test]
fn notifications_stack_with_the_stacked_preset() {
    let mut app = PortfolioApp::new(Preset::Stacked.config());
    app.click_selector("#download-resume").unwrap();
    app.click_selector("#download-resume").unwrap();
    app.click_selector("#download-resume").unwrap();
    assert_eq!(app.notifications().len(), 2);

    let mut single = PortfolioApp::new(Preset::Classic.config());
    single.click_selector("#download-resume").unwrap();
    single.click_selector("#download-resume").unwrap();
    assert_eq!(single.notifications().len(), 1);
}

#[test]
fn notifications_dismiss_and_are_removed() {
    let mut app = app();
    app.click_selector("#download-resume").unwrap();
    let element = app.notifications()[0].element;
    app.advance(5000);
    assert!(app.notifications()[0].leaving);
    app.advance(300);
    assert!(app.notifications().is_empty());
    assert!(!app.page().exists(element));
}

#[test]
fn scenario_file_runs_against_the_demo_page() {
    let scenario = Scenario::from_json(
        r##"{
            "name": "contact flow",
            "steps": [
                { "type": "load" },
                { "type": "wait", "ms": 1000 },
                { "type": "assert_class", "selector": "body", "class": "loaded" },
                { "type": "input", "selector": "[name=\"name\"]", "value": "Al" },
                { "type": "input", "selector": "[name=\"email\"]", "value": "a@b.com" },
                { "type": "input", "selector": "[name=\"subject\"]", "value": "Hi there" },
                { "type": "input", "selector": "[name=\"message\"]", "value": "This is long enough." },
                { "type": "submit" },
                { "type": "assert_valid", "valid": true, "errors": 0 },
                { "type": "assert_text", "selector": "#contact-form button", "contains": "Sending" },
                { "type": "wait", "ms": 2000 },
                { "type": "assert_notification", "severity": "success", "contains": "Message sent" },
                { "type": "click", "selector": "#download-resume" },
                { "type": "assert_download", "filename": "resume.txt", "contains": "# Alex Morgan" },
                { "type": "scroll", "y": 150 },
                { "type": "assert_class", "selector": "#navbar", "class": "scrolled" },
                { "type": "click", "selector": ".scroll-to-top" },
                { "type": "wait", "ms": 700 },
                { "type": "assert_scroll", "y": 0 },
                { "type": "assert_class", "selector": "#navbar", "class": "scrolled", "present": false }
            ]
        }"##,
    )
    .unwrap();

    let mut app = app();
    let report = scenario.run(&mut app);
    assert!(report.is_passed(), "{report}");
    assert_eq!(report.passed, scenario.steps.len());
    assert_eq!(report.elapsed_ms, 3700);
}
