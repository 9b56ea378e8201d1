//! Viewport intersection observer
//!
//! Reports when observed elements start or stop being visible enough, the
//! way `IntersectionObserver` does in a browser. Visibility is vertical
//! only: the page model has no horizontal layout.

use std::str::FromStr;

use crate::page::{ElementId, Page};

/// Grows (positive) or shrinks (negative) the viewport before intersecting
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same margin on top and bottom
    pub const fn vertical(px: f32) -> Self {
        Self::new(px, 0.0, px, 0.0)
    }
}

impl FromStr for RootMargin {
    type Err = String;

    /// CSS margin shorthand in px: one to four values, e.g. `"0px 0px -50px 0px"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(|v| {
                let number = v.strip_suffix("px").unwrap_or(v);
                number
                    .parse::<f32>()
                    .map_err(|_| format!("invalid margin value `{v}`"))
            })
            .collect::<Result<Vec<f32>, String>>()?;

        match values.as_slice() {
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [v, h] => Ok(Self::new(*v, *h, *v, *h)),
            [t, h, b] => Ok(Self::new(*t, *h, *b, *h)),
            [t, r, b, l] => Ok(Self::new(*t, *r, *b, *l)),
            _ => Err(format!("expected 1 to 4 margin values, got `{s}`")),
        }
    }
}

/// Observer configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Visible fraction in `[0, 1]` at which an element counts as intersecting
    pub threshold: f32,
    pub root_margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::ZERO,
        }
    }
}

impl ObserverOptions {
    pub fn new(threshold: f32, root_margin: RootMargin) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin,
        }
    }
}

/// A visibility change for one observed element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub ratio: f32,
    pub is_intersecting: bool,
}

/// Fraction of the element's height inside the margin-adjusted viewport
pub fn visible_ratio(page: &Page, id: ElementId, margin: RootMargin) -> f32 {
    let Some(rect) = page.rect(id) else {
        return 0.0;
    };
    let viewport = page.viewport();
    let root_top = viewport.scroll_y - margin.top;
    let root_bottom = viewport.scroll_y + viewport.height + margin.bottom;

    if rect.height <= 0.0 {
        return if rect.top >= root_top && rect.top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }

    let overlap = rect.bottom().min(root_bottom) - rect.top.max(root_top);
    (overlap.max(0.0) / rect.height).clamp(0.0, 1.0)
}

/// Tracks a set of elements and reports intersection changes
#[derive(Clone, Debug, Default)]
pub struct IntersectionObserver {
    options: ObserverOptions,
    /// Observed elements with their last reported state (None = not yet reported)
    observed: Vec<(ElementId, Option<bool>)>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            observed: Vec::new(),
        }
    }

    pub fn options(&self) -> ObserverOptions {
        self.options
    }

    pub fn observe(&mut self, id: ElementId) {
        if !self.is_observing(id) {
            self.observed.push((id, None));
        }
    }

    pub fn unobserve(&mut self, id: ElementId) {
        self.observed.retain(|(observed, _)| *observed != id);
    }

    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    pub fn is_observing(&self, id: ElementId) -> bool {
        self.observed.iter().any(|(observed, _)| *observed == id)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Whether the element currently satisfies the threshold
    pub fn is_intersecting(&self, page: &Page, id: ElementId) -> bool {
        let ratio = visible_ratio(page, id, self.options.root_margin);
        ratio > 0.0 && ratio >= self.options.threshold
    }

    /// Compare every observed element against its last reported state.
    ///
    /// Newly observed elements always produce an initial entry. Elements
    /// removed from the page are dropped silently.
    pub fn check(&mut self, page: &Page) -> Vec<IntersectionEntry> {
        self.observed.retain(|(id, _)| page.exists(*id));

        let options = self.options;
        let mut entries = Vec::new();
        for (id, last) in self.observed.iter_mut() {
            let ratio = visible_ratio(page, *id, options.root_margin);
            let is_intersecting = ratio > 0.0 && ratio >= options.threshold;
            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: *id,
                    ratio,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_block(top: f32, height: f32) -> (Page, ElementId) {
        let mut page = Page::new(1280.0, 800.0);
        page.set_document_height(4000.0);
        let body = page.body();
        let block = page.append(body, "div").rect(top, height).finish();
        (page, block)
    }

    #[test]
    fn test_root_margin_parsing() {
        assert_eq!(
            "0px 0px -50px 0px".parse::<RootMargin>().unwrap(),
            RootMargin::new(0.0, 0.0, -50.0, 0.0)
        );
        assert_eq!(
            "-70px 0px".parse::<RootMargin>().unwrap(),
            RootMargin::new(-70.0, 0.0, -70.0, 0.0)
        );
        assert_eq!("5".parse::<RootMargin>().unwrap(), RootMargin::new(5.0, 5.0, 5.0, 5.0));
        assert!("1px 2px 3px 4px 5px".parse::<RootMargin>().is_err());
        assert!("abc".parse::<RootMargin>().is_err());
    }

    #[test]
    fn test_visible_ratio_respects_margin() {
        let (mut page, block) = page_with_block(700.0, 200.0);
        // viewport 0..800 covers 700..800 of 700..900
        assert!((visible_ratio(&page, block, RootMargin::ZERO) - 0.5).abs() < 1e-6);
        // bottom margin -50 shrinks root to 0..750
        let margin = RootMargin::new(0.0, 0.0, -50.0, 0.0);
        assert!((visible_ratio(&page, block, margin) - 0.25).abs() < 1e-6);

        page.scroll_to(1000.0);
        assert_eq!(visible_ratio(&page, block, RootMargin::ZERO), 0.0);
    }

    #[test]
    fn test_check_reports_only_changes() {
        let (mut page, block) = page_with_block(1000.0, 400.0);
        let mut observer = IntersectionObserver::new(ObserverOptions::new(0.5, RootMargin::ZERO));
        observer.observe(block);
        observer.observe(block);
        assert_eq!(observer.observed_count(), 1);

        let initial = observer.check(&page);
        assert_eq!(initial.len(), 1);
        assert!(!initial[0].is_intersecting);
        assert!(observer.check(&page).is_empty());

        // 25% visible: below threshold, no change
        page.scroll_to(300.0);
        assert!(observer.check(&page).is_empty());

        page.scroll_to(500.0);
        let entries = observer.check(&page);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);

        observer.unobserve(block);
        page.scroll_to(0.0);
        assert!(observer.check(&page).is_empty());
    }

    #[test]
    fn test_removed_elements_are_dropped() {
        let (mut page, block) = page_with_block(0.0, 100.0);
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(block);
        page.remove(block);
        assert!(observer.check(&page).is_empty());
        assert_eq!(observer.observed_count(), 0);
    }
}
