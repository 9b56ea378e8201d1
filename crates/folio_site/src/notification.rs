//! Transient notifications
//!
//! A notification is a `div.notification.status.status--<severity>` appended
//! to the body. It slides in from the right, stays for the configured
//! duration, slides out and is removed once the exit slide has played.

use std::fmt;
use std::str::FromStr;

use folio_animation::{Animation, AnimationPreset, AnimationScheduler, AnimationTarget};
use folio_core::{ElementId, Page, TimerId, TimerQueue};
use serde::{Deserialize, Serialize};

use crate::config::{NotificationConfig, NotificationPolicy};
use crate::context::Task;

/// Horizontal distance of the enter/exit slide
const SLIDE_DISTANCE: f32 = 400.0;
/// Offset of the first notification from the top of the viewport
const TOP_OFFSET: f32 = 100.0;
/// Vertical spacing between stacked notifications
const STACK_SPACING: f32 = 80.0;
const ENTER_MS: u32 = 300;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "success" => Ok(Severity::Success),
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            other => Err(format!("unknown severity `{other}`")),
        }
    }
}

/// A notification currently attached to the page
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub element: ElementId,
    pub message: String,
    pub severity: Severity,
    /// Exit slide already started
    pub leaving: bool,
    dismiss_timer: Option<TimerId>,
    remove_timer: Option<TimerId>,
}

pub struct NotificationCenter {
    config: NotificationConfig,
    visible: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            config,
            visible: Vec::new(),
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Notifications on the page, oldest first
    pub fn visible(&self) -> &[Notification] {
        &self.visible
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.visible.last()
    }

    pub fn show(
        &mut self,
        page: &mut Page,
        animations: &mut AnimationScheduler,
        timers: &mut TimerQueue<Task>,
        message: &str,
        severity: Severity,
    ) -> ElementId {
        let capacity = match self.config.policy {
            NotificationPolicy::Single => 1,
            NotificationPolicy::Stack => self.config.max_visible.max(1),
        };
        while self.visible.len() >= capacity {
            let oldest = self.visible[0].element;
            self.remove(page, animations, timers, oldest);
        }

        let body = page.body();
        let element = page
            .append(body, "div")
            .class("notification")
            .class("status")
            .class(&format!("status--{severity}"))
            .attr("role", "status")
            .style("position", "fixed")
            .style("right", "20px")
            .text(message)
            .finish();
        animations.start(
            AnimationTarget::Element(element),
            Animation::Visual(AnimationPreset::slide_in_right(ENTER_MS, SLIDE_DISTANCE)),
            page,
        );

        let dismiss_timer =
            timers.schedule(self.config.duration_ms, Task::DismissNotification(element));
        self.visible.push(Notification {
            element,
            message: message.to_string(),
            severity,
            leaving: false,
            dismiss_timer: Some(dismiss_timer),
            remove_timer: None,
        });
        self.layout(page);
        tracing::debug!("notification ({severity}): {message}");
        element
    }

    /// Start the exit slide; the element is removed `exit_ms` later
    pub fn dismiss(
        &mut self,
        page: &mut Page,
        animations: &mut AnimationScheduler,
        timers: &mut TimerQueue<Task>,
        element: ElementId,
    ) {
        let exit_ms = self.config.exit_ms;
        let Some(entry) = self.visible.iter_mut().find(|n| n.element == element) else {
            return;
        };
        if entry.leaving {
            return;
        }
        entry.leaving = true;
        if let Some(timer) = entry.dismiss_timer.take() {
            timers.cancel(timer);
        }
        animations.start(
            AnimationTarget::Element(element),
            Animation::Visual(AnimationPreset::slide_out_right(exit_ms, SLIDE_DISTANCE)),
            page,
        );
        entry.remove_timer = Some(timers.schedule(
            u64::from(exit_ms),
            Task::RemoveNotification(element),
        ));
    }

    /// Detach a notification immediately, cancelling its pending timers
    pub fn remove(
        &mut self,
        page: &mut Page,
        animations: &mut AnimationScheduler,
        timers: &mut TimerQueue<Task>,
        element: ElementId,
    ) {
        let Some(index) = self.visible.iter().position(|n| n.element == element) else {
            return;
        };
        let entry = self.visible.remove(index);
        for timer in [entry.dismiss_timer, entry.remove_timer].into_iter().flatten() {
            timers.cancel(timer);
        }
        animations.cancel_target(AnimationTarget::Element(element));
        page.remove(element);
        self.layout(page);
    }

    /// Stack notifications top-down in the order they appeared
    fn layout(&self, page: &mut Page) {
        for (index, entry) in self.visible.iter().enumerate() {
            let top = TOP_OFFSET + index as f32 * STACK_SPACING;
            page.set_style(entry.element, "top", &format!("{top}px"));
        }
    }
}
