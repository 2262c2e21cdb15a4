//! Ingestion error types

use commdex_index::IndexError;
use thiserror::Error;

/// Result type alias for ingestion
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Ingestion-specific error types
#[derive(Error, Debug)]
pub enum IngestError {
    /// The source as a whole cannot be read; aborts the run
    #[error("Unable to read source {source_name}: {reason}")]
    SourceRead { source_name: String, reason: String },

    /// One item of a source cannot be decoded; the item is skipped
    #[error("Skipping unreadable item {item}: {reason}")]
    SourceItem { item: String, reason: String },

    /// The fetch service returned less than it claimed to have
    #[error("Fetch service protocol violation: {0}")]
    RemoteProtocol(String),

    #[error("Fetch service unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

impl IngestError {
    pub fn source_read(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceRead {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn source_item(item: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceItem {
            item: item.into(),
            reason: reason.to_string(),
        }
    }
}
