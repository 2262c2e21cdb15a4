//! Commdex Index - Tantivy-backed storage for communication search
//!
//! Provides the write session used while building an index, the read-only
//! searcher used while serving it, and a cheap existence check.

use std::path::Path;

use tantivy::directory::MmapDirectory;
use tantivy::Index;

pub mod dump;
pub mod error;
pub mod record;
pub mod schema;
pub mod searcher;
pub mod traits;
pub mod writer;

pub use dump::dump_index;
pub use error::{IndexError, IndexResult};
pub use record::{extract_records, IndexedRecord};
pub use searcher::TantivyCommunicationSearcher;
pub use traits::{CommunicationIndexer, CommunicationSearcher, SearchHit};
pub use writer::TantivyCommunicationIndexer;

/// Whether `location` holds an index that can be opened.
///
/// Never creates or modifies anything; a missing or empty location, or one
/// that cannot be inspected, yields `false`.
pub fn index_exists(location: &Path) -> bool {
    if !location.is_dir() {
        return false;
    }

    let dir = match MmapDirectory::open(location) {
        Ok(dir) => dir,
        Err(e) => {
            tracing::info!("Unable to test if index exists at {:?}: {}", location, e);
            return false;
        }
    };

    match Index::exists(&dir) {
        Ok(exists) => exists,
        Err(e) => {
            tracing::info!("Unable to test if index exists at {:?}: {}", location, e);
            false
        }
    }
}
