//! Index engine traits

use commdex_core::Communication;

pub use crate::error::{IndexError, IndexResult as Result};

/// A ranked match returned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub communication_id: String,
    pub sentence_id: Option<String>,
    pub score: f32,
}

/// Write session against an index location
pub trait CommunicationIndexer: Send {
    /// Submit a communication; returns the number of records written.
    ///
    /// Zero means the communication had nothing indexable and was skipped.
    fn add(&mut self, communication: &Communication) -> Result<usize>;

    /// Flush and release the session. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// Read-only query access to a built index
pub trait CommunicationSearcher: Send + Sync {
    /// Run `raw_query` and return at most `limit` hits, best first
    fn search(&self, raw_query: &str, limit: usize) -> Result<Vec<SearchHit>>;

    /// Release read resources. Calling it again is a no-op.
    fn close(&self) -> Result<()>;
}
