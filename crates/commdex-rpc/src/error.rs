//! Service-level errors surfaced to RPC callers

use commdex_index::IndexError;
use serde_json::json;
use thiserror::Error;

use crate::transport::{JsonRpcError, SERVICE_ERROR};

/// Result type alias for the search service
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Failures a caller sees as structured RPC errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unable to parse query: {query}")]
    QueryParse { query: String, reason: String },

    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Index read failed: {0}")]
    IndexRead(String),
}

impl ServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::QueryParse { .. } => "QueryParseError",
            Self::IndexUnavailable(_) => "IndexUnavailable",
            Self::IndexRead(_) => "IndexRead",
        }
    }

    pub fn to_rpc_error(&self) -> JsonRpcError {
        let data = match self {
            Self::QueryParse { query, reason } => {
                json!({ "kind": self.kind(), "query": query, "reason": reason })
            }
            _ => json!({ "kind": self.kind() }),
        };
        JsonRpcError {
            code: SERVICE_ERROR,
            message: self.to_string(),
            data: Some(data),
        }
    }
}

impl From<IndexError> for ServiceError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::QueryParse { query, reason } => Self::QueryParse { query, reason },
            IndexError::Unavailable(reason) | IndexError::Open { reason, .. } => {
                Self::IndexUnavailable(reason)
            }
            other => Self::IndexRead(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parse_carries_query() {
        let err = ServiceError::from(IndexError::QueryParse {
            query: "term1 AND".to_string(),
            reason: "unexpected end".to_string(),
        });
        let rpc = err.to_rpc_error();
        assert_eq!(rpc.code, SERVICE_ERROR);
        assert!(rpc.message.contains("term1 AND"));
        let data = rpc.data.unwrap();
        assert_eq!(data["kind"], "QueryParseError");
        assert_eq!(data["query"], "term1 AND");
    }

    #[test]
    fn test_read_failure_kind() {
        let err = ServiceError::from(IndexError::Read("segment missing".to_string()));
        assert_eq!(err.kind(), "IndexRead");
        assert!(err.to_rpc_error().data.unwrap().get("query").is_none());
    }
}
