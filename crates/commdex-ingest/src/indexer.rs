//! Drives a document source into an index write session

use std::num::NonZeroUsize;

use commdex_index::CommunicationIndexer;
use tracing::Instrument;

use crate::error::IngestResult;
use crate::progress::{IngestStats, LogProgress, ProgressObserver};
use crate::source::DocumentSource;

/// Drains a source into an index.
///
/// The write session is closed exactly once per run, whether the run
/// succeeds or fails. When both the run and the close fail, the run's error
/// is returned and the close failure is logged.
pub struct Indexer<O: ProgressObserver = LogProgress> {
    batch_size: NonZeroUsize,
    observer: O,
}

impl Indexer<LogProgress> {
    pub fn new(batch_size: NonZeroUsize) -> Self {
        Self::with_observer(batch_size, LogProgress)
    }
}

impl<O: ProgressObserver> Indexer<O> {
    pub fn with_observer(batch_size: NonZeroUsize, observer: O) -> Self {
        Self {
            batch_size,
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub async fn run<I>(&mut self, source: &mut DocumentSource, index: &mut I) -> IngestResult<IngestStats>
    where
        I: CommunicationIndexer + ?Sized,
    {
        let span = tracing::info_span!("ingest", source = %source.describe());
        let outcome = self.drain(source, index).instrument(span).await;

        match (outcome, index.close()) {
            (Ok(stats), Ok(())) => Ok(stats),
            (Ok(_), Err(close_err)) => Err(close_err.into()),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                tracing::error!("Failed to close index after ingestion error: {}", close_err);
                Err(e)
            }
        }
    }

    async fn drain<I>(&mut self, source: &mut DocumentSource, index: &mut I) -> IngestResult<IngestStats>
    where
        I: CommunicationIndexer + ?Sized,
    {
        source.ensure_available().await?;
        tracing::info!("Indexing from {}", source.describe());

        let batch = self.batch_size.get() as u64;
        let mut stats = IngestStats::default();
        let mut unindexable = 0u64;
        let mut processed = 0u64;

        while let Some(communication) = source.next().await? {
            let written = index.add(&communication)?;
            if written == 0 {
                tracing::debug!("Communication {} has nothing to index", communication.id);
                unindexable += 1;
            } else {
                stats.indexed += 1;
                stats.records += written as u64;
            }

            processed += 1;
            if processed % batch == 0 {
                stats.skipped = unindexable + source.skipped();
                self.observer.progress(&stats, source.expected());
            }
        }

        stats.skipped = unindexable + source.skipped();
        self.observer.finished(&stats);
        Ok(stats)
    }
}
