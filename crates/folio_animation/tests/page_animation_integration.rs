//! Integration tests for the scheduler driving page elements
//!
//! These tests verify that:
//! - Entrance animations land elements in their resting style
//! - Staggered delays keep later elements hidden until their turn
//! - State machine transitions can trigger animations

use folio_animation::{
    Animation, AnimationPreset, AnimationScheduler, AnimationTarget, FillMode,
};
use folio_core::fsm::menu;
use folio_core::Page;

#[test]
fn test_staggered_entrance() {
    let mut page = Page::new(1280.0, 800.0);
    let body = page.body();
    let items: Vec<_> = (0..3)
        .map(|i| page.append(body, "h1").rect(i as f32 * 50.0, 40.0).finish())
        .collect();

    let mut scheduler = AnimationScheduler::new();
    for (index, item) in items.iter().enumerate() {
        let anim = AnimationPreset::fade_in_up(600, 30.0)
            .delay(index as u32 * 200)
            .fill_mode(FillMode::Both);
        scheduler.start(AnimationTarget::Element(*item), Animation::Visual(anim), &mut page);
    }

    // every item starts from the backwards-filled first frame
    for item in &items {
        assert_eq!(page.style(*item, "opacity"), Some("0"));
    }

    scheduler.tick(600.0, &mut page);
    assert_eq!(page.style(items[0], "opacity"), Some("1"));
    assert_ne!(page.style(items[2], "opacity"), Some("1"));

    scheduler.tick(400.0, &mut page);
    for item in &items {
        assert_eq!(page.style(*item, "opacity"), Some("1"));
        assert_eq!(page.style(*item, "transform"), Some("translateY(0)"));
    }
    assert!(!scheduler.has_active_animations());
}

#[test]
fn test_menu_transition_triggers_animation() {
    let mut page = Page::new(390.0, 844.0);
    let body = page.body();
    let nav_menu = page.append(body, "ul").id("nav-menu").finish();

    let mut fsm = menu::machine();
    let mut scheduler = AnimationScheduler::new();

    let state = fsm.send(menu::TOGGLE);
    let anim = if state == menu::OPEN {
        AnimationPreset::slide_in_right(300, 390.0)
    } else {
        AnimationPreset::slide_out_right(300, 390.0)
    };
    scheduler.start(AnimationTarget::Element(nav_menu), Animation::Visual(anim), &mut page);
    assert_eq!(page.style(nav_menu, "transform"), Some("translateX(390px)"));

    scheduler.tick(300.0, &mut page);
    assert_eq!(page.style(nav_menu, "transform"), Some("translateX(0)"));
}
