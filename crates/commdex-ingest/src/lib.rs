//! Commdex Ingest - Document sources and the indexer that drains them
//!
//! Sources read communications from a zip archive, a directory, or a paged
//! remote fetch service. The [`Indexer`] submits each one to an index write
//! session and reports progress as it goes.

pub mod error;
pub mod fetch;
pub mod indexer;
pub mod progress;
pub mod source;

pub use error::{IngestError, IngestResult};
pub use fetch::{FetchClient, FetchResult};
pub use indexer::Indexer;
pub use progress::{IngestStats, LogProgress, ProgressObserver};
pub use source::{ArchiveSource, DirectorySource, DocumentSource, RemoteFetchSource};
