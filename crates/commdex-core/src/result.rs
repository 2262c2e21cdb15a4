//! Search result types

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::query::SearchQuery;

/// Unique identifier for a search response
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultSetId(pub Ulid);

impl ResultSetId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ResultSetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResultSetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provenance attached to every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationMetadata {
    /// Name of the tool that produced the response
    pub tool: String,

    /// Unix timestamp (seconds)
    pub timestamp: i64,

    pub k_best: u32,
}

impl AnnotationMetadata {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            timestamp: Utc::now().timestamp(),
            k_best: 1,
        }
    }
}

/// One match: a sentence (or a whole communication) and its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub communication_id: String,

    /// Absent for communication-level matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_id: Option<String>,

    pub score: f32,
}

/// Response envelope for a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultSet {
    pub uuid: ResultSetId,

    /// The query this response answers, echoed verbatim
    pub search_query: SearchQuery,

    pub metadata: AnnotationMetadata,

    /// Always present on the wire; no matches is `[]`
    #[serde(default)]
    pub search_result_items: Vec<SearchResultItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl SearchResultSet {
    /// Empty response for `query` with a fresh identifier
    pub fn for_query(query: SearchQuery, tool: impl Into<String>) -> Self {
        Self {
            uuid: ResultSetId::new(),
            search_query: query,
            metadata: AnnotationMetadata::new(tool),
            search_result_items: Vec::new(),
            lang: None,
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn len(&self) -> usize {
        self.search_result_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.search_result_items.is_empty()
    }
}
