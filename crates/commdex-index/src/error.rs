//! Index error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for index operations
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Index-specific error types
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to open index at {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("Index write failed: {0}")]
    Write(String),

    #[error("Unable to parse query: {query}")]
    QueryParse { query: String, reason: String },

    #[error("Index read failed: {0}")]
    Read(String),

    #[error("Index unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    pub(crate) fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
