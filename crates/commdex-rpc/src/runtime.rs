//! Service runtime: binds the listener and hosts the router on its own task

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use commdex_index::CommunicationSearcher;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::server::{create_router, RpcService};

/// A bound but not yet running search server
pub struct SearchServer<S: CommunicationSearcher + 'static> {
    listener: TcpListener,
    service: Arc<RpcService<S>>,
}

impl<S: CommunicationSearcher + 'static> SearchServer<S> {
    /// Bind `addr`. Failure to bind is returned to the caller.
    pub async fn bind(addr: SocketAddr, service: RpcService<S>) -> anyhow::Result<Self> {
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!("Unable to bind search service to {}: {}", addr, e);
                return Err(e).with_context(|| format!("Failed to bind search service to {}", addr));
            }
        };

        Ok(Self {
            listener,
            service: Arc::new(service),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn service(&self) -> Arc<RpcService<S>> {
        Arc::clone(&self.service)
    }

    /// Run the accept loop in its own task
    pub fn spawn(self) -> anyhow::Result<ServerHandle> {
        let local_addr = self.listener.local_addr()?;
        let router = create_router(Arc::clone(&self.service));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tracing::info!("Search service listening on {}", local_addr);
        tracing::info!("  RPC endpoint: http://{}/rpc", local_addr);
        tracing::info!("  Health check: http://{}/health", local_addr);

        let listener = self.listener;
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Ok(ServerHandle {
            local_addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }
}

/// Handle to a running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Ask the server to stop accepting; in-flight requests finish.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the server task to end. Returns immediately once it has.
    pub async fn join(&mut self) -> anyhow::Result<()> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };
        let outcome = task.await;
        self.task = None;

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(anyhow::Error::new(e).context("Search service failed")),
            Err(e) => Err(anyhow::Error::new(e).context("Search service task failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::tests::MockSearcher;
    use crate::handler::SearchHandler;

    fn service() -> RpcService<MockSearcher> {
        RpcService::new(SearchHandler::new(MockSearcher::default(), "eng"))
    }

    fn loopback() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }

    #[tokio::test]
    async fn test_spawn_serves_and_shuts_down() {
        let server = SearchServer::bind(loopback(), service()).await.unwrap();
        let mut handle = server.spawn().unwrap();
        let url = format!("http://{}/rpc", handle.local_addr());

        let body: serde_json::Value = reqwest::Client::new()
            .post(&url)
            .json(&serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "alive"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["result"], true);

        handle.shutdown();
        handle.join().await.unwrap();
        handle.join().await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let first = SearchServer::bind(loopback(), service()).await.unwrap();
        let taken = first.local_addr().unwrap();

        let second = SearchServer::bind(taken, service()).await;
        assert!(second.is_err());
    }
}
