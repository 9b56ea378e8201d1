//! Shared runtime handed to every controller
//!
//! Controllers never talk to each other. They share the page, the animation
//! scheduler, the timer queue and the notification center through this
//! struct, and hand delayed work back to the app as [`Task`]s.

use folio_animation::{Animation, AnimationPreset, AnimationScheduler, AnimationTarget, Easing};
use folio_core::{ElementId, Page, SelectorList, TimerId, TimerQueue};

use crate::config::NotificationConfig;
use crate::error::{Result, SiteError};
use crate::notification::{NotificationCenter, Severity};

/// Length of one animation frame on the virtual clock
pub const FRAME_MS: u64 = 16;

/// Delayed work, dispatched by the app when its timer fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Drop the temporary body colour transition after a theme switch
    ClearThemeTransition,
    /// Type the next character of the hero highlight
    TypeNextChar,
    /// Finish hiding a filtered-out project card
    HideCard(ElementId),
    /// Simulated delivery of the contact message completed
    DeliverMessage,
    /// Start the exit slide of a notification
    DismissNotification(ElementId),
    /// Remove a notification after its exit slide
    RemoveNotification(ElementId),
    /// Trailing recompute of the active nav link after a throttled scroll
    NavRecheck,
}

pub struct Runtime {
    pub page: Page,
    pub animations: AnimationScheduler,
    pub timers: TimerQueue<Task>,
    pub notifications: NotificationCenter,
    /// Duration of programmatic smooth scrolls
    pub scroll_duration_ms: u32,
    pub scroll_easing: Easing,
}

impl Runtime {
    pub fn new(page: Page, notifications: NotificationConfig, scroll_duration_ms: u32) -> Self {
        Self {
            page,
            animations: AnimationScheduler::new(),
            timers: TimerQueue::new(),
            notifications: NotificationCenter::new(notifications),
            scroll_duration_ms,
            scroll_easing: Easing::CSS_EASE_IN_OUT,
        }
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub fn schedule(&mut self, delay_ms: u64, task: Task) -> TimerId {
        self.timers.schedule(delay_ms, task)
    }

    pub fn notify(&mut self, message: &str, severity: Severity) -> ElementId {
        self.notifications.show(
            &mut self.page,
            &mut self.animations,
            &mut self.timers,
            message,
            severity,
        )
    }

    /// Animate the viewport to `y`, clamped to the scrollable range. A new
    /// smooth scroll replaces one still running.
    pub fn smooth_scroll_to(&mut self, y: f32) {
        let from = self.page.scroll_y();
        let to = y.clamp(0.0, self.page.max_scroll());
        tracing::debug!("smooth scroll {from} -> {to}");
        self.animations.start(
            AnimationTarget::Viewport,
            Animation::ScrollTop(AnimationPreset::smooth_scroll(
                self.scroll_duration_ms,
                from,
                to,
                self.scroll_easing,
            )),
            &mut self.page,
        );
    }

    /// First element matching `selector`, or a missing-element error naming
    /// the feature that needed it
    pub fn require(&self, feature: &'static str, selector: &str) -> Result<ElementId> {
        self.page
            .query_selector(selector)?
            .ok_or_else(|| SiteError::MissingElement {
                feature,
                selector: selector.to_string(),
            })
    }

    /// Every element matching `selector`; an empty match is not an error
    pub fn select_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self.page.select_all(&list))
    }

    /// Whether `target` is `element` or one of its descendants
    pub fn hit(&self, element: ElementId, target: ElementId) -> bool {
        self.page.contains(element, target)
    }
}
