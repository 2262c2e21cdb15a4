//! Commdex Core - Data model for communication search
//!
//! This crate provides the communication, query, and result types shared by
//! the indexer, the search service, and the command line tool.

pub mod communication;
pub mod config;
pub mod error;
pub mod limits;
pub mod query;
pub mod result;
pub mod service;

pub use communication::{Communication, Section, Sentence, TextSpan, Token};
pub use config::{FetchEndpoint, IngestConfig, SourceSpec, TokenizerMode};
pub use error::{Error, Result};
pub use limits::{
    ValidationError, DEFAULT_BATCH_SIZE, DEFAULT_FETCH_HOST, DEFAULT_LANGUAGE, DEFAULT_PORT,
    MAX_SEARCH_RESULTS,
};
pub use query::{SearchQuery, SearchType};
pub use result::{AnnotationMetadata, ResultSetId, SearchResultItem, SearchResultSet};
pub use service::{SearchCapability, ServiceInfo};
