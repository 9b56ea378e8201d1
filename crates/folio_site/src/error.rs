//! Site errors

use std::path::PathBuf;

use folio_core::CoreError;
use folio_theme::ThemeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    /// Markup a feature needs is not on the page
    #[error("{feature}: no element matches `{selector}`")]
    MissingElement {
        feature: &'static str,
        selector: String,
    },

    #[error("unknown preset `{0}` (available: classic, observer, stacked, minimal)")]
    UnknownPreset(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse configuration")]
    ConfigSyntax(#[from] toml::de::Error),

    #[error("failed to serialize configuration")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Download name that is not a single plain path component
    #[error("download file name `{0}` must not contain path separators or `..`")]
    UnsafeFilename(String),

    #[error("invalid scenario")]
    Scenario(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SiteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiteError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
