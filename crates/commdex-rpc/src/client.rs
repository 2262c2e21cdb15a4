//! JSON-RPC client for a remote fetch service

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use commdex_core::FetchEndpoint;
use commdex_ingest::{FetchClient, FetchResult, IngestError, IngestResult};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::transport::{JsonRpcRequest, JsonRpcResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Speaks the fetch protocol (`alive`, `getCommunicationCount`,
/// `getCommunicationIDs`, `fetch`) over `POST /rpc`.
pub struct JsonRpcFetchClient {
    http: reqwest::Client,
    endpoint: FetchEndpoint,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcFetchClient {
    pub fn new(endpoint: FetchEndpoint) -> IngestResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IngestError::source_read(endpoint.to_string(), e))?;
        let url = format!("http://{}:{}/rpc", endpoint.host, endpoint.port);

        Ok(Self {
            http,
            endpoint,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    /// Boxed constructor, usable as a `DocumentSource` connector
    pub fn connect(endpoint: &FetchEndpoint) -> IngestResult<Box<dyn FetchClient>> {
        Ok(Box::new(Self::new(endpoint.clone())?))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method`; a `null` or missing result is `None`.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> IngestResult<Option<T>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IngestError::source_read(self.describe(), e))?
            .json()
            .await
            .map_err(|e| IngestError::RemoteProtocol(format!("{} returned an invalid response: {}", method, e)))?;

        if let Some(error) = response.error {
            return Err(IngestError::RemoteProtocol(format!(
                "{} failed ({}): {}",
                method, error.code, error.message
            )));
        }

        match response.result {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| IngestError::RemoteProtocol(format!("{} returned an unexpected result: {}", method, e))),
        }
    }
}

#[async_trait]
impl FetchClient for JsonRpcFetchClient {
    async fn alive(&self) -> IngestResult<bool> {
        match self.call::<bool>("alive", serde_json::Value::Null).await {
            Ok(alive) => Ok(alive.unwrap_or(false)),
            Err(e) => Err(IngestError::RemoteUnavailable(e.to_string())),
        }
    }

    async fn count(&self) -> IngestResult<u64> {
        let count = self
            .call::<i64>("getCommunicationCount", serde_json::Value::Null)
            .await?
            .ok_or_else(|| IngestError::RemoteProtocol("getCommunicationCount returned no count".to_string()))?;
        u64::try_from(count)
            .map_err(|_| IngestError::RemoteProtocol(format!("getCommunicationCount returned {}", count)))
    }

    async fn list_ids(&self, offset: u64, limit: u64) -> IngestResult<Option<Vec<String>>> {
        self.call("getCommunicationIDs", json!({ "offset": offset, "count": limit }))
            .await
    }

    async fn fetch(&self, ids: &[String]) -> IngestResult<Option<FetchResult>> {
        self.call("fetch", json!({ "communicationIds": ids })).await
    }

    fn describe(&self) -> String {
        format!("fetch service {}", self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, routing::post, Json, Router};
    use commdex_core::{Communication, SourceSpec};
    use commdex_ingest::{DocumentSource, Indexer};
    use serde_json::Value;
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    /// Minimal fetch service holding `n` communications
    async fn fetch_service(n: usize, alive: bool) -> FetchEndpoint {
        let comms: Arc<Vec<Communication>> = Arc::new(
            (0..n)
                .map(|i| Communication::new(format!("c{}", i)).with_text(format!("text {}", i)))
                .collect(),
        );

        async fn rpc(
            State((comms, alive)): State<(Arc<Vec<Communication>>, bool)>,
            Json(request): Json<JsonRpcRequest>,
        ) -> Json<JsonRpcResponse> {
            let result = match request.method.as_str() {
                "alive" => json!(alive),
                "getCommunicationCount" => json!(comms.len()),
                "getCommunicationIDs" => {
                    let offset = request.params["offset"].as_u64().unwrap() as usize;
                    let count = request.params["count"].as_u64().unwrap() as usize;
                    let ids: Vec<&str> = comms.iter().skip(offset).take(count).map(|c| c.id.as_str()).collect();
                    if ids.is_empty() {
                        Value::Null
                    } else {
                        json!(ids)
                    }
                }
                "fetch" => {
                    let wanted: Vec<String> =
                        serde_json::from_value(request.params["communicationIds"].clone()).unwrap();
                    let found: Vec<&Communication> = comms.iter().filter(|c| wanted.contains(&c.id)).collect();
                    json!({ "communications": found })
                }
                other => {
                    return Json(JsonRpcResponse::error(request.id, -32601, format!("Method not found: {}", other)))
                }
            };
            Json(JsonRpcResponse::success(request.id, result))
        }

        let router = Router::new().route("/rpc", post(rpc)).with_state((comms, alive));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        FetchEndpoint::new("127.0.0.1", addr.port()).unwrap()
    }

    #[tokio::test]
    async fn test_client_methods() {
        let endpoint = fetch_service(5, true).await;
        let client = JsonRpcFetchClient::new(endpoint).unwrap();

        assert!(client.alive().await.unwrap());
        assert_eq!(client.count().await.unwrap(), 5);
        assert_eq!(
            client.list_ids(3, 10).await.unwrap(),
            Some(vec!["c3".to_string(), "c4".to_string()])
        );
        assert_eq!(client.list_ids(10, 10).await.unwrap(), None);

        let fetched = client.fetch(&["c1".to_string()]).await.unwrap().unwrap();
        assert_eq!(fetched.communications.len(), 1);
        assert_eq!(fetched.communications[0].id, "c1");
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = JsonRpcFetchClient::new(FetchEndpoint::new("127.0.0.1", port).unwrap()).unwrap();
        assert!(matches!(client.alive().await, Err(IngestError::RemoteUnavailable(_))));
        assert!(matches!(client.count().await, Err(IngestError::SourceRead { .. })));
    }

    #[tokio::test]
    async fn test_remote_ingestion_end_to_end() {
        struct CountingIndexer(Vec<String>, usize);

        impl commdex_index::CommunicationIndexer for CountingIndexer {
            fn add(&mut self, communication: &Communication) -> commdex_index::IndexResult<usize> {
                self.0.push(communication.id.clone());
                Ok(1)
            }

            fn close(&mut self) -> commdex_index::IndexResult<()> {
                self.1 += 1;
                Ok(())
            }
        }

        let endpoint = fetch_service(7, true).await;
        let batch = NonZeroUsize::new(3).unwrap();
        let spec = SourceSpec::Remote { endpoint };
        let mut source = DocumentSource::open(&spec, batch, JsonRpcFetchClient::connect).unwrap();
        let mut index = CountingIndexer(Vec::new(), 0);

        let stats = Indexer::new(batch).run(&mut source, &mut index).await.unwrap();

        assert_eq!(stats.indexed, 7);
        assert_eq!(index.0.len(), 7);
        assert_eq!(index.1, 1);
    }

    #[tokio::test]
    async fn test_dead_service_is_unavailable() {
        let endpoint = fetch_service(2, false).await;
        let batch = NonZeroUsize::new(3).unwrap();
        let spec = SourceSpec::Remote { endpoint };
        let source = DocumentSource::open(&spec, batch, JsonRpcFetchClient::connect).unwrap();

        let result = source.ensure_available().await;
        assert!(matches!(result, Err(IngestError::RemoteUnavailable(_))));
    }
}
