//! Theme errors

use folio_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("unknown color scheme `{0}` (expected `light` or `dark`)")]
    UnknownScheme(String),

    #[error("invalid color `{value}`: {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("failed to persist theme preference")]
    Store(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, ThemeError>;
