//! Ingestion configuration

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::limits::{validate_fetch_endpoint, DEFAULT_BATCH_SIZE};

/// How indexed text is tokenized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerMode {
    /// The index engine tokenizes sentence text itself
    Native,
    /// Tokens carried by each sentence are indexed as given
    #[default]
    PreTokenized,
}

/// Address of a remote fetch service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchEndpoint {
    pub host: String,
    pub port: u16,
}

impl FetchEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        validate_fetch_endpoint(&host, port)?;
        Ok(Self { host, port })
    }
}

impl std::fmt::Display for FetchEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Where documents are ingested from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum SourceSpec {
    /// A single packaged file of communications
    Archive { path: PathBuf },
    /// One serialized communication per file
    Directory { path: PathBuf },
    /// A paginated remote fetch service
    Remote { endpoint: FetchEndpoint },
}

impl SourceSpec {
    /// Choose exactly one source from the configured candidates.
    ///
    /// Both or neither is a configuration error, rejected before any I/O.
    /// Only then is a local path classified as a directory or an archive,
    /// which looks at the filesystem.
    pub fn select(direct_path: Option<PathBuf>, fetch: Option<FetchEndpoint>) -> Result<Self> {
        match (direct_path, fetch) {
            (Some(path), Some(endpoint)) => Err(Error::Configuration(format!(
                "Both a direct ingest path ({}) and a fetch service ({}) were given; choose one",
                path.display(),
                endpoint
            ))),
            (None, None) => Err(Error::Configuration(
                "Either a direct ingest path or a fetch service must be set".to_string(),
            )),
            (None, Some(endpoint)) => Ok(Self::Remote { endpoint }),
            (Some(path), None) => Ok(Self::local(path)),
        }
    }

    /// Classify a local path: directories are read file by file, anything
    /// else is treated as an archive.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Directory { path }
        } else {
            Self::Archive { path }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Archive { path } => format!("archive {}", path.display()),
            Self::Directory { path } => format!("directory {}", path.display()),
            Self::Remote { endpoint } => format!("fetch service {}", endpoint),
        }
    }
}

/// Settings for one ingestion run; fixed once the run starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub source: SourceSpec,
    pub index_dir: PathBuf,

    /// Progress granularity, and page size for remote sources
    pub batch_size: NonZeroUsize,

    pub tokenizer: TokenizerMode,
}

impl IngestConfig {
    pub fn new(source: SourceSpec, index_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            index_dir: index_dir.into(),
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            tokenizer: TokenizerMode::default(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerMode) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }
}
