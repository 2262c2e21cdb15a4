//! Index lifecycle: build, then serve

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use commdex_core::IngestConfig;
use commdex_index::{index_exists, TantivyCommunicationIndexer, TantivyCommunicationSearcher};
use commdex_ingest::{DocumentSource, IngestStats, Indexer};
use commdex_rpc::{JsonRpcFetchClient, RpcService, SearchHandler, SearchServer, ServerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unbuilt,
    Building,
    Ready,
    Serving,
}

/// A running search service and the handler it serves
pub struct Serving {
    pub handle: ServerHandle,
    pub service: Arc<RpcService<TantivyCommunicationSearcher>>,
}

impl Serving {
    /// Stop the listener, wait for it, then release the index.
    pub async fn stop(mut self) -> anyhow::Result<()> {
        self.handle.shutdown();
        let joined = self.handle.join().await;
        self.service.handler().close();
        joined
    }
}

pub struct LifecycleController {
    index_dir: PathBuf,
    state: LifecycleState,
}

impl LifecycleController {
    pub fn new(index_dir: impl Into<PathBuf>) -> Self {
        let index_dir = index_dir.into();
        let state = if index_exists(&index_dir) {
            LifecycleState::Ready
        } else {
            LifecycleState::Unbuilt
        };
        tracing::debug!("Index at {:?} starts {:?}", index_dir, state);

        Self { index_dir, state }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    /// Build the index from `config.source`. Any failure leaves the
    /// controller `Unbuilt`.
    pub async fn build(&mut self, config: &IngestConfig) -> anyhow::Result<IngestStats> {
        if self.state == LifecycleState::Serving {
            anyhow::bail!("Cannot build the index while it is being served");
        }

        self.state = LifecycleState::Building;
        match self.run_build(config).await {
            Ok(stats) => {
                self.state = LifecycleState::Ready;
                Ok(stats)
            }
            Err(e) => {
                self.state = LifecycleState::Unbuilt;
                Err(e)
            }
        }
    }

    async fn run_build(&self, config: &IngestConfig) -> anyhow::Result<IngestStats> {
        tracing::info!(
            "Building index at {:?} from {}",
            self.index_dir,
            config.source.describe()
        );

        let mut source = DocumentSource::open(&config.source, config.batch_size, JsonRpcFetchClient::connect)?;
        let mut writer = TantivyCommunicationIndexer::open(&self.index_dir, config.tokenizer)?;
        let stats = Indexer::new(config.batch_size)
            .run(&mut source, &mut writer)
            .await
            .context("Index build failed")?;

        tracing::info!("Index built: {} communications, {} skipped", stats.indexed, stats.skipped);
        Ok(stats)
    }

    /// Open the index read-only and start serving it on `addr`.
    pub async fn serve(&mut self, addr: SocketAddr, language: &str) -> anyhow::Result<Serving> {
        if self.state == LifecycleState::Serving {
            anyhow::bail!("The index is already being served");
        }
        if !index_exists(&self.index_dir) {
            self.state = LifecycleState::Unbuilt;
            anyhow::bail!(
                "Cannot run search as the index does not exist at {}",
                self.index_dir.display()
            );
        }

        let searcher = TantivyCommunicationSearcher::open(&self.index_dir)?;
        let handler = SearchHandler::new(searcher, language)
            .with_description(format!("Communication search over {}", self.index_dir.display()));
        let server = SearchServer::bind(addr, RpcService::new(handler)).await?;
        let service = server.service();
        let handle = server.spawn()?;

        self.state = LifecycleState::Serving;
        Ok(Serving { handle, service })
    }
}
