//! Animation scheduler
//!
//! Owns every running animation and writes its current frame into the page
//! each tick: `opacity`/`transform` styles, a `width` percentage, or the
//! viewport scroll offset.

use folio_core::{ElementId, Page};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::keyframe::{css_number, KeyframeAnimation, MultiKeyframeAnimation};

new_key_type! {
    pub struct AnimationId;
}

/// What an animation writes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationTarget {
    Element(ElementId),
    /// The window scroll position
    Viewport,
}

/// Animation plus the property it drives
#[derive(Clone, Debug)]
pub enum Animation {
    /// `opacity` and `transform` styles
    Visual(MultiKeyframeAnimation),
    /// `width` style as a percentage
    WidthPercent(KeyframeAnimation),
    /// Vertical scroll offset in pixels
    ScrollTop(KeyframeAnimation),
}

impl Animation {
    fn start(&mut self) {
        match self {
            Animation::Visual(a) => a.start(),
            Animation::WidthPercent(a) | Animation::ScrollTop(a) => a.start(),
        }
    }

    fn tick(&mut self, dt_ms: f32) {
        match self {
            Animation::Visual(a) => a.tick(dt_ms),
            Animation::WidthPercent(a) | Animation::ScrollTop(a) => a.tick(dt_ms),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            Animation::Visual(a) => a.is_finished(),
            Animation::WidthPercent(a) | Animation::ScrollTop(a) => a.is_finished(),
        }
    }

    fn is_playing(&self) -> bool {
        match self {
            Animation::Visual(a) => a.is_playing(),
            Animation::WidthPercent(a) | Animation::ScrollTop(a) => a.is_playing(),
        }
    }

    /// Animations of the same channel on the same target supersede each other
    fn same_channel(&self, other: &Animation) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

struct ActiveAnimation {
    target: AnimationTarget,
    animation: Animation,
}

/// Result of one scheduler tick
#[derive(Debug, Default)]
pub struct TickReport {
    /// Animations that completed during this tick
    pub finished: SmallVec<[AnimationId; 4]>,
    /// Whether the viewport scroll offset was written
    pub scrolled: bool,
}

/// The animation scheduler that ticks all active animations
pub struct AnimationScheduler {
    animations: SlotMap<AnimationId, ActiveAnimation>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            animations: SlotMap::with_key(),
        }
    }

    /// Start `animation` on `target`, replacing one already running on the
    /// same target and channel. The first frame is applied immediately.
    pub fn start(
        &mut self,
        target: AnimationTarget,
        mut animation: Animation,
        page: &mut Page,
    ) -> AnimationId {
        let superseded: SmallVec<[AnimationId; 2]> = self
            .animations
            .iter()
            .filter(|(_, a)| a.target == target && a.animation.same_channel(&animation))
            .map(|(id, _)| id)
            .collect();
        for id in superseded {
            self.animations.remove(id);
        }

        animation.start();
        let active = ActiveAnimation { target, animation };
        apply_frame(&active, page);
        tracing::trace!("animation started on {:?}", target);
        self.animations.insert(active)
    }

    pub fn cancel(&mut self, id: AnimationId) -> bool {
        self.animations.remove(id).is_some()
    }

    /// Cancel everything running on `target`, leaving its styles as they are
    pub fn cancel_target(&mut self, target: AnimationTarget) -> usize {
        let before = self.animations.len();
        self.animations.retain(|_, a| a.target != target);
        before - self.animations.len()
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.animations.contains_key(id)
    }

    pub fn is_animating(&self, target: AnimationTarget) -> bool {
        self.animations.values().any(|a| a.target == target)
    }

    /// Advance every animation by `dt_ms` and write the frames into the page
    pub fn tick(&mut self, dt_ms: f32, page: &mut Page) -> TickReport {
        let mut report = TickReport::default();

        self.animations.retain(|_, a| match a.target {
            AnimationTarget::Element(id) => page.exists(id),
            AnimationTarget::Viewport => true,
        });

        for (id, active) in self.animations.iter_mut() {
            active.animation.tick(dt_ms);
            if apply_frame(active, page) {
                report.scrolled = true;
            }
            if active.animation.is_finished() {
                finish(active, page);
                report.finished.push(id);
            }
        }

        for id in &report.finished {
            self.animations.remove(*id);
        }
        report
    }

    /// Check if any animations are still active
    pub fn has_active_animations(&self) -> bool {
        self.animations.values().any(|a| a.animation.is_playing())
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn clear(&mut self) {
        self.animations.clear();
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the current frame. Returns true when the scroll offset changed.
fn apply_frame(active: &ActiveAnimation, page: &mut Page) -> bool {
    match (&active.animation, active.target) {
        (Animation::Visual(anim), AnimationTarget::Element(id)) => {
            if let Some(props) = anim.current_properties() {
                if let Some(opacity) = props.opacity_css() {
                    page.set_style(id, "opacity", &opacity);
                }
                if let Some(transform) = props.transform_css() {
                    page.set_style(id, "transform", &transform);
                }
            }
            false
        }
        (Animation::WidthPercent(anim), AnimationTarget::Element(id)) => {
            if !anim.in_delay() {
                page.set_style(id, "width", &format!("{}%", css_number(anim.value())));
            }
            false
        }
        (Animation::ScrollTop(anim), AnimationTarget::Viewport) => {
            let before = page.scroll_y();
            let after = page.scroll_to(anim.value());
            (after - before).abs() > f32::EPSILON
        }
        (animation, target) => {
            tracing::warn!("animation {:?} cannot drive {:?}", animation, target);
            false
        }
    }
}

/// Clear animated styles of finished animations that do not fill forwards
fn finish(active: &ActiveAnimation, page: &mut Page) {
    let AnimationTarget::Element(id) = active.target else {
        return;
    };
    match &active.animation {
        Animation::Visual(anim) if !anim.holds_end() => {
            page.remove_style(id, "opacity");
            page.remove_style(id, "transform");
        }
        Animation::WidthPercent(anim) if !anim.holds_end() => {
            page.remove_style(id, "width");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::keyframe::FillMode;
    use crate::presets::AnimationPreset;

    fn page_with_block() -> (Page, ElementId) {
        let mut page = Page::new(1280.0, 800.0);
        page.set_document_height(3000.0);
        let body = page.body();
        let block = page.append(body, "div").rect(100.0, 50.0).finish();
        (page, block)
    }

    #[test]
    fn test_visual_animation_writes_styles() {
        let (mut page, block) = page_with_block();
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.start(
            AnimationTarget::Element(block),
            Animation::Visual(AnimationPreset::fade_in_up(600, 30.0)),
            &mut page,
        );
        assert_eq!(page.style(block, "opacity"), Some("0"));
        assert!(scheduler.has_active_animations());

        let report = scheduler.tick(600.0, &mut page);
        assert_eq!(report.finished.as_slice(), &[id]);
        assert_eq!(page.style(block, "opacity"), Some("1"));
        assert_eq!(page.style(block, "transform"), Some("translateY(0)"));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_no_fill_clears_styles_on_finish() {
        let (mut page, block) = page_with_block();
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(
            AnimationTarget::Element(block),
            Animation::Visual(AnimationPreset::fade_in(100).fill_mode(FillMode::None)),
            &mut page,
        );
        scheduler.tick(100.0, &mut page);
        assert_eq!(page.style(block, "opacity"), None);
    }

    #[test]
    fn test_width_waits_for_delay() {
        let (mut page, block) = page_with_block();
        page.set_style(block, "width", "0%");
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(
            AnimationTarget::Element(block),
            Animation::WidthPercent(AnimationPreset::width_grow(1000, 90.0).delay(200)),
            &mut page,
        );
        scheduler.tick(100.0, &mut page);
        assert_eq!(page.style(block, "width"), Some("0%"));
        scheduler.tick(1100.0, &mut page);
        assert_eq!(page.style(block, "width"), Some("90%"));
    }

    #[test]
    fn test_scroll_animation_reports_scrolling() {
        let (mut page, _) = page_with_block();
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(
            AnimationTarget::Viewport,
            Animation::ScrollTop(AnimationPreset::smooth_scroll(
                400,
                0.0,
                1000.0,
                Easing::CSS_EASE_IN_OUT,
            )),
            &mut page,
        );
        let report = scheduler.tick(200.0, &mut page);
        assert!(report.scrolled);
        assert!(page.scroll_y() > 0.0 && page.scroll_y() < 1000.0);
        scheduler.tick(200.0, &mut page);
        assert_eq!(page.scroll_y(), 1000.0);
    }

    #[test]
    fn test_new_animation_supersedes_same_channel() {
        let (mut page, block) = page_with_block();
        let mut scheduler = AnimationScheduler::new();
        let target = AnimationTarget::Element(block);
        let first = scheduler.start(
            target,
            Animation::Visual(AnimationPreset::scale_in(300)),
            &mut page,
        );
        let second = scheduler.start(
            target,
            Animation::Visual(AnimationPreset::scale_out(300)),
            &mut page,
        );
        let width = scheduler.start(
            target,
            Animation::WidthPercent(AnimationPreset::width_grow(300, 50.0)),
            &mut page,
        );
        assert!(!scheduler.is_running(first));
        assert!(scheduler.is_running(second));
        assert!(scheduler.is_running(width));

        assert_eq!(scheduler.cancel_target(target), 2);
        assert!(!scheduler.is_animating(target));
    }

    #[test]
    fn test_removed_targets_are_dropped() {
        let (mut page, block) = page_with_block();
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(
            AnimationTarget::Element(block),
            Animation::Visual(AnimationPreset::fade_in(300)),
            &mut page,
        );
        page.remove(block);
        scheduler.tick(16.0, &mut page);
        assert!(scheduler.is_empty());
    }
}
