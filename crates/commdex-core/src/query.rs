//! Query types for searching the communication index

use serde::{Deserialize, Serialize};

/// Unit of text a search can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
    /// Whole communications
    Communications,
    /// Individual sentences
    Sentences,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Communications => "communications",
            Self::Sentences => "sentences",
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search request as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Query text, passed verbatim to the index engine; required on the wire
    pub raw_query: String,

    /// Optional caller-supplied name for the query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Requested language (ISO 639-2/T)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Requested corpus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl SearchQuery {
    /// Create a query from raw text
    pub fn new(raw_query: impl Into<String>) -> Self {
        Self {
            raw_query: raw_query.into(),
            ..Default::default()
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// True when the query carries no search terms at all
    pub fn is_blank(&self) -> bool {
        self.raw_query.trim().is_empty()
    }
}
