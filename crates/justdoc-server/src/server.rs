use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use justdoc_store::DocumentStore;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::AppState;
use crate::router::build_router;

/// JustDoc HTTP server.
///
/// Owns the store handle for its lifetime and closes it once serving stops.
pub struct JustDocServer {
    config: ServerConfig,
    store: Arc<dyn DocumentStore>,
}

impl JustDocServer {
    pub fn new(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(Arc::clone(&self.store), self.config.max_body_size))
    }

    /// Serve on the configured address until Ctrl-C or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `shutdown` resolves, then close the store.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let addr = listener.local_addr()?;
        tracing::info!(%addr, db = %self.config.db_path.display(), "JustDoc listening");

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        tracing::info!("shutting down, closing store");
        let store = Arc::clone(&self.store);
        let closed = tokio::task::spawn_blocking(move || store.close()).await?;
        served?;
        closed?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use justdoc_store::{InMemoryDocumentStore, StoreError};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[test]
    fn server_construction() {
        let server = JustDocServer::new(
            ServerConfig::default(),
            Arc::new(InMemoryDocumentStore::new()),
        );
        assert_eq!(server.config().bind_addr, "0.0.0.0:8080".parse().unwrap());
        let _router = server.router();
    }

    #[tokio::test]
    async fn serves_until_shutdown_then_closes_store() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.put_document("myapp", "settings", b"{}").unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = JustDocServer::new(ServerConfig::default(), store.clone());
        let handle = tokio::spawn(server.serve_on(listener, async move {
            let _ = rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#"[{"name":"myapp","document_count":1}]"#));

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
        assert!(matches!(store.list_channels(), Err(StoreError::Closed)));
    }
}
