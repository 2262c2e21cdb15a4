//! Commdex RPC - JSON-RPC search service and fetch client
//!
//! Exposes a built index over JSON-RPC 2.0 (`POST /rpc`) and provides the
//! client used to ingest from a remote fetch service.

pub mod client;
pub mod error;
pub mod handler;
pub mod runtime;
pub mod server;
pub mod transport;

pub use client::JsonRpcFetchClient;
pub use error::{ServiceError, ServiceResult};
pub use handler::SearchHandler;
pub use runtime::{SearchServer, ServerHandle};
pub use server::{create_router, RpcService};
pub use transport::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
