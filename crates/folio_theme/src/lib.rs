//! Folio Theme System
//!
//! Light/dark theming for the portfolio page.
//!
//! # Overview
//!
//! - **Color schemes**: [`ColorScheme`] with toggle and parsing
//! - **System detection**: [`detect_system_color_scheme`] asks the desktop
//!   for its preference
//! - **Palettes**: [`ColorTokens`] exported as `--color-*` custom properties
//! - **Controller**: [`ThemeController`] resolves, applies and persists the
//!   scheme
//!
//! # Quick Start
//!
//! ```rust
//! use folio_core::{MemoryStore, Page};
//! use folio_theme::{ColorScheme, ThemeController};
//!
//! let mut page = Page::default();
//! let mut store = MemoryStore::new();
//! let mut theme = ThemeController::default();
//!
//! theme.init(&mut page, &store, Some(ColorScheme::Dark));
//! theme.toggle_theme(&mut page, &mut store).unwrap();
//! assert_eq!(theme.scheme(), ColorScheme::Light);
//! ```

pub mod controller;
pub mod error;
pub mod palette;
pub mod platform;
pub mod scheme;

pub use controller::{ThemeController, ThemeSettings};
pub use error::{Result, ThemeError};
pub use palette::{Color, ColorToken, ColorTokens, ThemePalette};
pub use platform::detect_system_color_scheme;
pub use scheme::ColorScheme;
