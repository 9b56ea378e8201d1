//! Folio Core Runtime
//!
//! Foundational primitives for the headless portfolio page:
//!
//! - **Page tree**: elements, classes, attributes, inline styles and geometry
//! - **Selectors**: the CSS selector subset used to locate markup
//! - **Events**: click, scroll, input, submit and friends
//! - **State machines**: menu and submit-button interaction states
//! - **Virtual timers**: deterministic `setTimeout`
//! - **Intersection observer**: viewport visibility tracking
//! - **Preference storage**: the persisted theme slot
//!
//! # Example
//!
//! ```rust
//! use folio_core::Page;
//!
//! let mut page = Page::new(1280.0, 800.0);
//! let body = page.body();
//! let link = page
//!     .append(body, "a")
//!     .class("nav-link")
//!     .attr("href", "#about")
//!     .finish();
//!
//! assert_eq!(page.query_selector(".nav-link").unwrap(), Some(link));
//! page.add_class(link, "active");
//! assert!(page.has_class(link, "active"));
//! ```

pub mod error;
pub mod events;
pub mod fsm;
pub mod observer;
pub mod page;
pub mod selector;
pub mod store;
pub mod throttle;
pub mod timer;

pub use error::{CoreError, Result};
pub use events::{event_types, Event, EventData, EventType, KeyCode};
pub use fsm::{StateId, StateMachine, Transition};
pub use observer::{IntersectionEntry, IntersectionObserver, ObserverOptions, RootMargin};
pub use page::{ElementId, Page, Rect, Viewport};
pub use selector::SelectorList;
pub use store::{FileStore, MemoryStore, PreferenceStore};
pub use throttle::{Debounce, Throttle};
pub use timer::{TimerId, TimerQueue};
