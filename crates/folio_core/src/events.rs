//! Page events
//!
//! The event vocabulary the page controllers react to. Hosts translate
//! their native input into [`Event`]s and hand them to the app, which routes
//! them to each controller in turn.

use crate::page::ElementId;

/// Event type identifier
pub type EventType = u32;

/// Event types understood by the page controllers
pub mod event_types {
    use super::EventType;

    pub const CLICK: EventType = 1;
    pub const KEY_DOWN: EventType = 20;
    /// Value of a form control changed
    pub const INPUT: EventType = 22;
    /// Form control lost focus
    pub const BLUR: EventType = 23;
    pub const SUBMIT: EventType = 24;
    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;
    /// Document finished loading
    pub const LOAD: EventType = 60;
    /// The operating system switched between light and dark appearance
    pub const COLOR_SCHEME_CHANGE: EventType = 90;
}

/// A page event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: Option<ElementId>,
    pub data: EventData,
    /// Milliseconds on the page clock
    pub timestamp: u64,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Key { key: KeyCode },
    Input { value: String },
    Scroll { y: f32 },
    Resize { width: f32, height: f32 },
    ColorScheme { prefers_dark: bool },
    None,
}

/// Virtual key codes for the keys the page handles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const HOME: KeyCode = KeyCode(0x24);
    pub const END: KeyCode = KeyCode(0x23);

    pub const UNKNOWN: KeyCode = KeyCode(0);

    /// Map a `KeyboardEvent.key` style name to a key code
    pub fn from_name(name: &str) -> KeyCode {
        match name {
            "Tab" => Self::TAB,
            "Enter" => Self::ENTER,
            "Escape" | "Esc" => Self::ESCAPE,
            " " | "Space" => Self::SPACE,
            "Home" => Self::HOME,
            "End" => Self::END,
            _ => Self::UNKNOWN,
        }
    }
}

impl Event {
    pub fn new(event_type: EventType, target: Option<ElementId>, data: EventData) -> Self {
        Self {
            event_type,
            target,
            data,
            timestamp: 0,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn click(target: ElementId) -> Self {
        Self::new(event_types::CLICK, Some(target), EventData::None)
    }

    pub fn key_down(key: KeyCode) -> Self {
        Self::new(event_types::KEY_DOWN, None, EventData::Key { key })
    }

    pub fn input(target: ElementId, value: impl Into<String>) -> Self {
        Self::new(
            event_types::INPUT,
            Some(target),
            EventData::Input {
                value: value.into(),
            },
        )
    }

    pub fn blur(target: ElementId) -> Self {
        Self::new(event_types::BLUR, Some(target), EventData::None)
    }

    pub fn submit(form: ElementId) -> Self {
        Self::new(event_types::SUBMIT, Some(form), EventData::None)
    }

    pub fn scroll(y: f32) -> Self {
        Self::new(event_types::SCROLL, None, EventData::Scroll { y })
    }

    pub fn resize(width: f32, height: f32) -> Self {
        Self::new(event_types::RESIZE, None, EventData::Resize { width, height })
    }

    pub fn load() -> Self {
        Self::new(event_types::LOAD, None, EventData::None)
    }

    pub fn color_scheme_change(prefers_dark: bool) -> Self {
        Self::new(
            event_types::COLOR_SCHEME_CHANGE,
            None,
            EventData::ColorScheme { prefers_dark },
        )
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Suppress the host's default action (anchor jump, form navigation)
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is(&self, event_type: EventType) -> bool {
        self.event_type == event_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(KeyCode::from_name("Escape"), KeyCode::ESCAPE);
        assert_eq!(KeyCode::from_name("Esc"), KeyCode::ESCAPE);
        assert_eq!(KeyCode::from_name("q"), KeyCode::UNKNOWN);
    }

    #[test]
    fn test_event_flags() {
        let mut event = Event::scroll(120.0).at(42);
        assert!(event.is(event_types::SCROLL));
        assert_eq!(event.timestamp, 42);
        assert!(!event.default_prevented);
        event.prevent_default();
        event.stop_propagation();
        assert!(event.default_prevented);
        assert!(event.propagation_stopped);
    }
}
