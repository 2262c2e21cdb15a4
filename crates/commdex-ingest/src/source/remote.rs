//! Paged source over a remote fetch service

use std::collections::VecDeque;

use commdex_core::Communication;

use crate::error::{IngestError, IngestResult};
use crate::fetch::FetchClient;

/// Walks a fetch service page by page.
///
/// The total is read once; pages are requested at offsets `0, B, 2B, ...`
/// until the offset reaches the total, so a source of `N` communications
/// costs `ceil(N / B)` page requests. An empty page before the end is a
/// protocol violation and ends the run.
pub struct RemoteFetchSource {
    client: Box<dyn FetchClient>,
    page_size: u64,
    total: Option<u64>,
    offset: u64,
    pages: u64,
    buffer: VecDeque<Communication>,
}

impl RemoteFetchSource {
    pub fn new(client: Box<dyn FetchClient>, page_size: u64) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
            total: None,
            offset: 0,
            pages: 0,
            buffer: VecDeque::new(),
        }
    }

    pub fn describe(&self) -> String {
        self.client.describe()
    }

    /// Total reported by the service, once known
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Fails with `RemoteUnavailable` unless the service answers its
    /// liveness probe.
    pub async fn ensure_alive(&self) -> IngestResult<()> {
        match self.client.alive().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(IngestError::RemoteUnavailable(format!(
                "{} reports it is not alive",
                self.client.describe()
            ))),
            Err(IngestError::RemoteUnavailable(reason)) => {
                Err(IngestError::RemoteUnavailable(reason))
            }
            Err(e) => Err(IngestError::RemoteUnavailable(e.to_string())),
        }
    }

    pub async fn next(&mut self) -> IngestResult<Option<Communication>> {
        loop {
            if let Some(communication) = self.buffer.pop_front() {
                return Ok(Some(communication));
            }

            let total = match self.total {
                Some(total) => total,
                None => {
                    let total = self.client.count().await?;
                    tracing::info!("{} holds {} communications", self.client.describe(), total);
                    self.total = Some(total);
                    total
                }
            };

            if self.offset >= total {
                return Ok(None);
            }
            self.fetch_page(total).await?;
        }
    }

    async fn fetch_page(&mut self, total: u64) -> IngestResult<()> {
        let expected = self.page_size.min(total - self.offset);
        self.pages += 1;

        let ids = match self.client.list_ids(self.offset, self.page_size).await? {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                return Err(IngestError::RemoteProtocol(format!(
                    "no ids returned for page at offset {} of {}",
                    self.offset, total
                )))
            }
        };
        if (ids.len() as u64) < expected {
            tracing::warn!(
                "Short page at offset {}: expected {} ids, got {}",
                self.offset,
                expected,
                ids.len()
            );
        }

        let communications = match self.client.fetch(&ids).await? {
            Some(result) if !result.communications.is_empty() => result.communications,
            _ => {
                return Err(IngestError::RemoteProtocol(format!(
                    "no communications returned for {} ids at offset {}",
                    ids.len(),
                    self.offset
                )))
            }
        };
        if communications.len() < ids.len() {
            tracing::warn!(
                "Fetched {} of {} requested communications at offset {}",
                communications.len(),
                ids.len(),
                self.offset
            );
        }

        tracing::debug!(
            "Fetched page {} ({} communications) at offset {}",
            self.pages,
            communications.len(),
            self.offset
        );

        self.offset += self.page_size;
        self.buffer.extend(communications);
        Ok(())
    }
}
