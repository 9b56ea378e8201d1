//! Core error types

use thiserror::Error;

/// Errors raised by the page model and preference storage
#[derive(Error, Debug)]
pub enum CoreError {
    /// A selector string could not be parsed
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A required element is not present in the page
    #[error("No element matches `{0}`")]
    MissingElement(String),

    /// The element handle no longer refers to a live element
    #[error("Element has been removed from the page")]
    StaleElement,

    /// Appending would make an element its own ancestor
    #[error("Cannot insert an element into its own subtree")]
    HierarchyRequest,

    /// Preference file could not be read or written
    #[error("Preference storage I/O failed: {0}")]
    StoreIo(#[from] std::io::Error),

    /// Preference file exists but is not a JSON string map
    #[error("Preference storage is corrupt: {0}")]
    StoreFormat(#[from] serde_json::Error),

    /// No platform configuration directory could be determined
    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
