//! Scroll-reactive chrome: the fixed navbar and the scroll-to-top button

use folio_core::ElementId;

use crate::config::{NavbarConfig, ScrollTopConfig};
use crate::context::Runtime;
use crate::error::Result;

const FEATURE: &str = "navbar";

pub struct Navbar {
    element: ElementId,
    config: NavbarConfig,
    last_y: f32,
}

impl Navbar {
    pub fn setup(rt: &mut Runtime, config: &NavbarConfig) -> Result<Self> {
        let element = rt.require(FEATURE, &config.selector)?;
        let mut navbar = Self {
            element,
            config: config.clone(),
            last_y: rt.page.scroll_y(),
        };
        navbar.scroll(rt);
        Ok(navbar)
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// `scrolled` past the near threshold; hidden while moving down past the
    /// far threshold, shown again on any upward scroll
    pub fn scroll(&mut self, rt: &mut Runtime) {
        let y = rt.page.scroll_y();
        if y > self.config.scrolled_threshold {
            rt.page.add_class(self.element, &self.config.scrolled_class);
        } else {
            rt.page.remove_class(self.element, &self.config.scrolled_class);
        }

        if self.config.hide_on_scroll {
            let transform = if y > self.last_y && y > self.config.hide_threshold {
                "translateY(-100%)"
            } else {
                "translateY(0)"
            };
            rt.page.set_style(self.element, "transform", transform);
        }
        self.last_y = y;
    }

    pub fn is_hidden(&self, rt: &Runtime) -> bool {
        rt.page.style(self.element, "transform") == Some("translateY(-100%)")
    }
}

pub struct ScrollTopButton {
    button: ElementId,
    show_after: f32,
    visible: bool,
}

impl ScrollTopButton {
    /// Creates the button and appends it to the body
    pub fn setup(rt: &mut Runtime, config: &ScrollTopConfig) -> Result<Self> {
        let body = rt.page.body();
        let button = rt
            .page
            .append(body, "button")
            .class(&config.class)
            .attr("type", "button")
            .attr("aria-label", "Scroll to top")
            .style("position", "fixed")
            .finish();
        let mut control = Self {
            button,
            show_after: config.show_after,
            visible: true,
        };
        control.apply(rt, false);
        control.scroll(rt);
        Ok(control)
    }

    pub fn button(&self) -> ElementId {
        self.button
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn scroll(&mut self, rt: &mut Runtime) {
        let visible = rt.page.scroll_y() > self.show_after;
        if visible != self.visible {
            self.apply(rt, visible);
        }
    }

    /// Smooth scroll to the top when the button is clicked
    pub fn click(&self, rt: &mut Runtime, target: ElementId) -> bool {
        if !rt.hit(self.button, target) {
            return false;
        }
        rt.smooth_scroll_to(0.0);
        true
    }

    fn apply(&mut self, rt: &mut Runtime, visible: bool) {
        let (opacity, visibility, transform) = if visible {
            ("1", "visible", "translateY(0)")
        } else {
            ("0", "hidden", "translateY(20px)")
        };
        rt.page.set_style(self.button, "opacity", opacity);
        rt.page.set_style(self.button, "visibility", visibility);
        rt.page.set_style(self.button, "transform", transform);
        self.visible = visible;
    }
}
