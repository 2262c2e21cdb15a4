//! Progress reporting for ingestion runs

/// Counters for one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Communications that produced at least one index record
    pub indexed: u64,

    /// Items that were undecodable or had nothing indexable
    pub skipped: u64,

    /// Index records written
    pub records: u64,
}

/// Receives progress observations from the indexer
pub trait ProgressObserver: Send {
    /// Called every `batch_size` communications
    fn progress(&mut self, stats: &IngestStats, expected: Option<u64>);

    /// Called once when the source is exhausted
    fn finished(&mut self, stats: &IngestStats);
}

/// Reports progress through `tracing`
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn progress(&mut self, stats: &IngestStats, expected: Option<u64>) {
        match expected {
            Some(total) => tracing::info!(
                "Indexed {}/{} communications ({} skipped)",
                stats.indexed,
                total,
                stats.skipped
            ),
            None => tracing::info!(
                "Indexed {} communications ({} skipped)",
                stats.indexed,
                stats.skipped
            ),
        }
    }

    fn finished(&mut self, stats: &IngestStats) {
        tracing::info!(
            "Finished: {} communications indexed as {} records, {} skipped",
            stats.indexed,
            stats.records,
            stats.skipped
        );
    }
}
