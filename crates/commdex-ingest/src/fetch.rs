//! Remote fetch service contract

use async_trait::async_trait;
use commdex_core::Communication;
use serde::{Deserialize, Serialize};

use crate::error::IngestResult;

/// Communications returned for one fetch request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    #[serde(default)]
    pub communications: Vec<Communication>,
}

/// Client for a service that enumerates and serves communications.
///
/// `None` from `list_ids` or `fetch` means the service returned no result.
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Liveness probe
    async fn alive(&self) -> IngestResult<bool>;

    /// Total number of communications the service holds
    async fn count(&self) -> IngestResult<u64>;

    /// Up to `limit` communication ids starting at `offset`
    async fn list_ids(&self, offset: u64, limit: u64) -> IngestResult<Option<Vec<String>>>;

    /// Retrieve communications by id
    async fn fetch(&self, ids: &[String]) -> IngestResult<Option<FetchResult>>;

    /// Human-readable name used in logs and errors
    fn describe(&self) -> String {
        "fetch service".to_string()
    }
}
