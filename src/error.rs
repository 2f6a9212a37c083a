//! Error types for the media catalog

use std::path::PathBuf;
use thiserror::Error;

/// The storage source could not be queried at all.
///
/// Returned from `reload`; the previously installed snapshot (if any) stays
/// in place. Per-row problems during a scan are never represented as this
/// error — they are skipped and logged.
#[derive(Debug, Error)]
#[error("media index unavailable: {message}")]
pub struct IndexUnavailable {
    /// The path involved, when one is known (database file or scan root)
    pub path: Option<PathBuf>,
    /// Human-readable error message
    pub message: String,
}

impl IndexUnavailable {
    /// Create a new error with no associated path
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }

    /// Create a new error for a specific path
    pub fn at_path(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path: Some(path),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for IndexUnavailable {
    fn from(err: rusqlite::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<std::io::Error> for IndexUnavailable {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<walkdir::Error> for IndexUnavailable {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        Self {
            path,
            message: err.to_string(),
        }
    }
}
