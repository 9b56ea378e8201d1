//! Mobile navigation menu

use folio_core::fsm::menu;
use folio_core::{ElementId, KeyCode, StateMachine};

use crate::config::MenuConfig;
use crate::context::Runtime;
use crate::error::Result;

const FEATURE: &str = "mobile-menu";

pub struct MobileMenu {
    hamburger: ElementId,
    menu: ElementId,
    links: Vec<ElementId>,
    state: StateMachine,
    open_class: String,
}

impl MobileMenu {
    pub fn setup(rt: &mut Runtime, config: &MenuConfig) -> Result<Self> {
        let hamburger = rt.require(FEATURE, &config.hamburger_selector)?;
        let nav_menu = rt.require(FEATURE, &config.menu_selector)?;
        let links = rt.select_all(&config.link_selector)?;
        Ok(Self {
            hamburger,
            menu: nav_menu,
            links,
            state: menu::machine(),
            open_class: config.open_class.clone(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.state.is_in(menu::OPEN)
    }

    /// Hamburger toggles; nav links and clicks outside both the hamburger
    /// and the menu close it
    pub fn click(&mut self, rt: &mut Runtime, target: ElementId) {
        let event = if rt.hit(self.hamburger, target) {
            menu::TOGGLE
        } else if self.links.iter().any(|link| rt.hit(*link, target))
            || !rt.hit(self.menu, target)
        {
            menu::DISMISS
        } else {
            return;
        };
        self.send(rt, event);
    }

    pub fn key_down(&mut self, rt: &mut Runtime, key: KeyCode) {
        if key == KeyCode::ESCAPE {
            self.send(rt, menu::DISMISS);
        }
    }

    fn send(&mut self, rt: &mut Runtime, event: folio_core::fsm::EventId) {
        let was_open = self.is_open();
        self.state.send(event);
        let open = self.is_open();
        if open == was_open {
            return;
        }
        for element in [self.hamburger, self.menu] {
            if open {
                rt.page.add_class(element, &self.open_class);
            } else {
                rt.page.remove_class(element, &self.open_class);
            }
        }
        rt.page
            .set_attribute(self.hamburger, "aria-expanded", if open { "true" } else { "false" });
        tracing::debug!("mobile menu {}", if open { "opened" } else { "closed" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use folio_core::Page;

    struct Fixture {
        rt: Runtime,
        hamburger: ElementId,
        menu_el: ElementId,
        link: ElementId,
        menu_item: ElementId,
        outside: ElementId,
    }

    fn fixture() -> Fixture {
        let mut page = Page::new(375.0, 700.0);
        let body = page.body();
        let nav = page.append(body, "nav").id("navbar").finish();
        let hamburger = page.append(nav, "button").id("hamburger").finish();
        let menu_el = page.append(nav, "ul").id("nav-menu").finish();
        let item = page.append(menu_el, "li").finish();
        let link = page.append(item, "a").class("nav-link").attr("href", "#about").finish();
        let outside = page.append(body, "main").finish();
        Fixture {
            rt: Runtime::new(page, NotificationConfig::default(), 600),
            hamburger,
            menu_el,
            link,
            menu_item: item,
            outside,
        }
    }

    #[test]
    fn test_hamburger_toggles_both_elements() {
        let mut f = fixture();
        let mut m = MobileMenu::setup(&mut f.rt, &MenuConfig::default()).unwrap();
        m.click(&mut f.rt, f.hamburger);
        assert!(m.is_open());
        assert!(f.rt.page.has_class(f.hamburger, "active"));
        assert!(f.rt.page.has_class(f.menu_el, "active"));
        m.click(&mut f.rt, f.hamburger);
        assert!(!m.is_open());
        assert!(!f.rt.page.has_class(f.menu_el, "active"));
    }

    #[test]
    fn test_link_outside_and_escape_close() {
        let mut f = fixture();
        let mut m = MobileMenu::setup(&mut f.rt, &MenuConfig::default()).unwrap();

        m.click(&mut f.rt, f.hamburger);
        m.click(&mut f.rt, f.menu_item);
        assert!(m.is_open(), "clicks inside the menu keep it open");
        m.click(&mut f.rt, f.link);
        assert!(!m.is_open());

        m.click(&mut f.rt, f.hamburger);
        m.click(&mut f.rt, f.outside);
        assert!(!m.is_open());

        m.click(&mut f.rt, f.hamburger);
        m.key_down(&mut f.rt, KeyCode::ENTER);
        assert!(m.is_open());
        m.key_down(&mut f.rt, KeyCode::ESCAPE);
        assert!(!m.is_open());
        assert_eq!(f.rt.page.attribute(f.hamburger, "aria-expanded"), Some("false"));
    }

    #[test]
    fn test_missing_hamburger_fails_setup() {
        let mut rt = Runtime::new(Page::default(), NotificationConfig::default(), 600);
        assert!(MobileMenu::setup(&mut rt, &MenuConfig::default()).is_err());
    }
}
