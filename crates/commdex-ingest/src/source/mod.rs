//! Document sources
//!
//! Every source yields communications one at a time until exhausted. Items
//! that cannot be decoded are logged and counted; failures of the source as
//! a whole are returned as errors.

mod archive;
mod directory;
mod remote;

pub use archive::ArchiveSource;
pub use directory::DirectorySource;
pub use remote::RemoteFetchSource;

#[cfg(test)]
pub(crate) use remote::tests::MockFetchClient;

use std::num::NonZeroUsize;

use commdex_core::{Communication, FetchEndpoint, SourceSpec};

use crate::error::IngestResult;
use crate::fetch::FetchClient;

/// One of the supported document sources, chosen at configuration time
pub enum DocumentSource {
    Archive(ArchiveSource),
    Directory(DirectorySource),
    Remote(RemoteFetchSource),
}

impl DocumentSource {
    /// Open the source described by `spec`.
    ///
    /// `connect` builds the client for a remote source; it is not called for
    /// local sources. `batch_size` is the remote page size.
    pub fn open<F>(spec: &SourceSpec, batch_size: NonZeroUsize, connect: F) -> IngestResult<Self>
    where
        F: FnOnce(&FetchEndpoint) -> IngestResult<Box<dyn FetchClient>>,
    {
        match spec {
            SourceSpec::Archive { path } => Ok(Self::Archive(ArchiveSource::open(path)?)),
            SourceSpec::Directory { path } => Ok(Self::Directory(DirectorySource::open(path)?)),
            SourceSpec::Remote { endpoint } => {
                let client = connect(endpoint)?;
                Ok(Self::Remote(RemoteFetchSource::new(client, batch_size.get() as u64)))
            }
        }
    }

    /// Confirm the source can be read before any indexing starts
    pub async fn ensure_available(&self) -> IngestResult<()> {
        match self {
            Self::Remote(source) => source.ensure_alive().await,
            Self::Archive(_) | Self::Directory(_) => Ok(()),
        }
    }

    pub async fn next(&mut self) -> IngestResult<Option<Communication>> {
        match self {
            Self::Archive(source) => source.next(),
            Self::Directory(source) => source.next(),
            Self::Remote(source) => source.next().await,
        }
    }

    /// Items skipped because they could not be read or decoded
    pub fn skipped(&self) -> u64 {
        match self {
            Self::Archive(source) => source.skipped(),
            Self::Directory(source) => source.skipped(),
            Self::Remote(_) => 0,
        }
    }

    /// Expected number of communications, when the source knows it
    pub fn expected(&self) -> Option<u64> {
        match self {
            Self::Remote(source) => source.total(),
            Self::Archive(_) | Self::Directory(_) => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Archive(source) => format!("archive {}", source.path().display()),
            Self::Directory(source) => format!("directory {}", source.path().display()),
            Self::Remote(source) => source.describe(),
        }
    }
}
