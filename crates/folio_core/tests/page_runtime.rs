//! Integration tests for the page tree, selectors, observer and timers
//!
//! These tests verify that:
//! - Portfolio-shaped markup can be located with the selector subset
//! - The intersection observer reacts to scrolling the page
//! - Timers and state machines compose the way the controllers use them

use folio_core::fsm::{menu, submit};
use folio_core::{
    CoreError, IntersectionObserver, ObserverOptions, Page, RootMargin, TimerQueue,
};

fn portfolio_page() -> Page {
    let mut page = Page::new(1280.0, 800.0);
    page.set_document_height(3000.0);
    let body = page.body();

    let nav = page.append(body, "nav").id("navbar").class("navbar").finish();
    let menu = page.append(nav, "ul").id("nav-menu").class("nav-menu").finish();
    for (i, section) in ["home", "about", "contact"].iter().enumerate() {
        let item = page.append(menu, "li").finish();
        page.append(item, "a")
            .class("nav-link")
            .attr("href", &format!("#{section}"))
            .text(section)
            .finish();
        page.append(body, "section")
            .id(section)
            .rect(i as f32 * 1000.0, 1000.0)
            .finish();
    }
    page
}

#[test]
fn test_selectors_find_navigation_markup() {
    let page = portfolio_page();

    let links = page.query_selector_all("#nav-menu .nav-link").unwrap();
    assert_eq!(links.len(), 3);

    let about = page.query_selector(r##".nav-link[href="#about"]"##).unwrap().unwrap();
    assert_eq!(page.text(about), Some("about"));

    let anchors = page.query_selector_all(r##"a[href^="#"]"##).unwrap();
    assert_eq!(anchors, links);

    let sections = page.query_selector_all("section[id]").unwrap();
    assert_eq!(sections.len(), 3);

    assert!(matches!(
        page.query_selector("nav >> a"),
        Err(CoreError::InvalidSelector { .. })
    ));
}

#[test]
fn test_observer_tracks_sections_while_scrolling() {
    let mut page = portfolio_page();
    let sections = page.query_selector_all("section[id]").unwrap();
    let mut observer = IntersectionObserver::new(ObserverOptions::new(
        0.3,
        RootMargin::vertical(-70.0),
    ));
    for section in &sections {
        observer.observe(*section);
    }

    let initial = observer.check(&page);
    assert_eq!(initial.len(), 3);
    let visible: Vec<_> = initial
        .iter()
        .filter(|e| e.is_intersecting)
        .map(|e| e.target)
        .collect();
    assert_eq!(visible, vec![sections[0]]);

    page.scroll_to(1000.0);
    let changes = observer.check(&page);
    assert!(changes
        .iter()
        .any(|e| e.target == sections[1] && e.is_intersecting));
    assert!(changes
        .iter()
        .any(|e| e.target == sections[0] && !e.is_intersecting));
}

#[test]
fn test_submit_cycle_driven_by_timers() {
    let mut fsm = submit::machine();
    let mut timers = TimerQueue::new();

    fsm.send(submit::SUBMIT);
    assert!(fsm.is_in(submit::SENDING));
    timers.schedule(2000, submit::DELIVERED);

    // a second submit while sending is ignored
    assert!(!fsm.can_send(submit::SUBMIT));

    for (_, event) in timers.advance_to(2000) {
        fsm.send(event);
    }
    assert!(fsm.is_in(submit::SENT));
    fsm.send(submit::RESET);
    assert!(fsm.is_in(submit::IDLE));
}

#[test]
fn test_menu_dismiss_is_noop_when_closed() {
    let mut fsm = menu::machine();
    assert_eq!(fsm.send(menu::DISMISS), menu::CLOSED);
    assert_eq!(fsm.send(menu::TOGGLE), menu::OPEN);
    assert_eq!(fsm.send(menu::DISMISS), menu::CLOSED);
    assert_eq!(fsm.history().len(), 2);
}
