//! JSON-RPC dispatch and the HTTP router that carries it

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use commdex_core::SearchQuery;
use commdex_index::CommunicationSearcher;
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handler::SearchHandler;
use crate::transport::{
    JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR,
};

/// Maximum request body size (1MB)
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// `search` accepts `{"query": {...}}` or the query object itself.
/// Either way the query must carry `rawQuery`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchParams {
    Wrapped { query: SearchQuery },
    Bare(SearchQuery),
}

impl SearchParams {
    fn into_query(self) -> SearchQuery {
        match self {
            Self::Wrapped { query } | Self::Bare(query) => query,
        }
    }
}

/// Routes JSON-RPC methods to a [`SearchHandler`]
pub struct RpcService<S: CommunicationSearcher> {
    handler: Arc<SearchHandler<S>>,
}

impl<S: CommunicationSearcher + 'static> RpcService<S> {
    pub fn new(handler: SearchHandler<S>) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn handler(&self) -> &SearchHandler<S> {
        &self.handler
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!("Received request: {:?}", request.method);

        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            );
        }

        match request.method.as_str() {
            "search" => self.handle_search(request.id, request.params).await,
            "about" => to_response(request.id, &self.handler.about()),
            "alive" => to_response(request.id, &self.handler.alive()),
            "getCapabilities" => to_response(request.id, &self.handler.capabilities()),
            "getCorpora" => to_response(request.id, &self.handler.corpora()),
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    async fn handle_search(&self, id: serde_json::Value, params: serde_json::Value) -> JsonRpcResponse {
        let query = match serde_json::from_value::<SearchParams>(params) {
            Ok(params) => params.into_query(),
            Err(e) => return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", e)),
        };

        let handler = Arc::clone(&self.handler);
        let outcome = tokio::task::spawn_blocking(move || handler.search(query)).await;

        match outcome {
            Ok(Ok(results)) => to_response(id, &results),
            Ok(Err(e)) => {
                tracing::warn!("Search failed: {}", e);
                JsonRpcResponse::failure(id, e.to_rpc_error())
            }
            Err(e) => {
                tracing::error!("Search task failed: {}", e);
                JsonRpcResponse::error(id, INTERNAL_ERROR, "Search task failed")
            }
        }
    }
}

fn to_response<T: serde::Serialize>(id: serde_json::Value, value: &T) -> JsonRpcResponse {
    match serde_json::to_value(value) {
        Ok(val) => JsonRpcResponse::success(id, val),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {}", e)),
    }
}

/// Create the HTTP router: `POST /rpc` and `GET /health`
pub fn create_router<S: CommunicationSearcher + 'static>(service: Arc<RpcService<S>>) -> Router {
    Router::new()
        .route("/rpc", post(rpc_handler::<S>))
        .route("/health", get(health_handler))
        .with_state(service)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}

/// Health check endpoint
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "server": "commdex",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn rpc_handler<S: CommunicationSearcher + 'static>(
    State(service): State<Arc<RpcService<S>>>,
    body: Bytes,
) -> Json<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return Json(JsonRpcResponse::error(
                serde_json::Value::Null,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            ))
        }
    };

    Json(service.handle_request(request).await)
}
