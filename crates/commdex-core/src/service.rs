//! Service identity and capability types

use serde::{Deserialize, Serialize};

use crate::query::SearchType;

/// Static identity reported by `about`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServiceInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An advertised (language, searchable unit) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchCapability {
    pub lang: String,

    #[serde(rename = "type")]
    pub search_type: SearchType,
}

impl SearchCapability {
    pub fn new(lang: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            lang: lang.into(),
            search_type,
        }
    }
}
