//! Folio Site Runtime
//!
//! The interactive behaviour of a single-page developer portfolio, run
//! headless against the [`folio_core::Page`] model.
//!
//! # Overview
//!
//! - **Configuration**: [`SiteConfig`] loaded from `folio.toml`, layered over
//!   a named [`Preset`]
//! - **Controllers**: navigation, mobile menu, navbar, scroll-to-top, reveal,
//!   skill bars, lazy images, hero entrance, typing, project filters, contact
//!   form, notifications and the résumé download
//! - **App**: [`PortfolioApp`] wires the controllers to events and the
//!   virtual clock
//! - **Scenarios**: [`Scenario`] scripts interactions and checks the result
//!
//! # Quick Start
//!
//! ```rust
//! use folio_site::{PortfolioApp, SiteConfig};
//!
//! let mut app = PortfolioApp::new(SiteConfig::default());
//! app.click_selector(r##".nav-link[href="#contact"]"##).unwrap();
//! app.advance(1000);
//! assert_eq!(app.active_section(), Some("contact"));
//! ```

pub mod app;
pub mod config;
pub mod contact;
pub mod context;
pub mod demo;
pub mod error;
pub mod filters;
pub mod hero;
pub mod menu;
pub mod navbar;
pub mod navigation;
pub mod notification;
pub mod resume;
pub mod reveal;
pub mod scenario;

pub use app::{PortfolioApp, PortfolioAppBuilder, SetupFailure};
pub use config::{Preset, SetupMode, SiteConfig, CONFIG_FILE};
pub use contact::{validate, Field, FieldError, FormValues, ValidationReport, ValidationRules};
pub use demo::build_demo_page;
pub use error::{Result, SiteError};
pub use notification::{Notification, Severity};
pub use resume::{
    generate_document, DirectorySink, DocumentFormat, Download, DownloadSink, MemorySink,
    RESUME_TEMPLATE,
};
pub use scenario::{AssertionResult, ReportStatus, Scenario, ScenarioReport, ScenarioStep};
