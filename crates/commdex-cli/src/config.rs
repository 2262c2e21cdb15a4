//! CLI configuration: optional TOML file merged under flags and env

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Context;
use commdex_core::limits::validate_batch_size;
use commdex_core::{
    FetchEndpoint, IngestConfig, SourceSpec, TokenizerMode, DEFAULT_BATCH_SIZE, DEFAULT_FETCH_HOST,
    DEFAULT_LANGUAGE, DEFAULT_PORT,
};
use serde::Deserialize;

use crate::Cli;

/// Contents of a `--config` file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub dir: Option<PathBuf>,
    pub language: Option<String>,
    pub direct: Option<PathBuf>,
    pub fetch_host: Option<String>,
    pub fetch_port: Option<u16>,
    pub batch: Option<usize>,
    pub tokenizer: Option<TokenizerMode>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub index_dir: PathBuf,
    pub language: String,
    pub direct: Option<PathBuf>,
    /// Set when either fetch flag was given
    pub fetch: Option<(String, Option<u16>)>,
    pub batch_size: NonZeroUsize,
    pub tokenizer: TokenizerMode,
    pub build: bool,
    pub serve: bool,
}

impl Settings {
    /// Merge flags (already merged with env by clap) over the file config
    /// and built-in defaults.
    pub fn resolve(cli: &Cli, file: FileConfig) -> anyhow::Result<Self> {
        if !cli.build_index && !cli.run_search {
            anyhow::bail!("You must select with the -r run option or -b build index");
        }

        let index_dir = cli
            .dir
            .clone()
            .or(file.dir)
            .context("An index directory is required (--dir)")?;

        let batch = cli.batch.or(file.batch).unwrap_or(DEFAULT_BATCH_SIZE);
        let batch_size = validate_batch_size(batch)?;

        let tokenizer = if cli.native_tokenizer {
            TokenizerMode::Native
        } else {
            file.tokenizer.unwrap_or_default()
        };

        let fetch_host = cli.fetch_host.clone().or(file.fetch_host);
        let fetch_port = cli.fetch_port.or(file.fetch_port);
        let fetch = match (fetch_host, fetch_port) {
            (None, None) => None,
            (host, port) => Some((host.unwrap_or_else(|| DEFAULT_FETCH_HOST.to_string()), port)),
        };

        Ok(Self {
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            index_dir,
            language: cli
                .language
                .clone()
                .or(file.language)
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            direct: cli.direct.clone().or(file.direct),
            fetch,
            batch_size,
            tokenizer,
            build: cli.build_index,
            serve: cli.run_search,
        })
    }

    /// Ingestion settings; fails when zero or two sources are configured
    pub fn ingest_config(&self) -> anyhow::Result<IngestConfig> {
        let endpoint = match &self.fetch {
            None => None,
            Some((host, Some(port))) => Some(FetchEndpoint::new(host.clone(), *port)?),
            Some((host, None)) => anyhow::bail!("A fetch port (--fp) is required to ingest from {}", host),
        };
        let source = SourceSpec::select(self.direct.clone(), endpoint)?;

        Ok(IngestConfig::new(source, &self.index_dir)
            .with_batch_size(self.batch_size)
            .with_tokenizer(self.tokenizer))
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}
