use std::sync::Arc;

use tokio::net::TcpListener;

use tally_store::{FileRecordStore, RecordStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Tally leaderboard server.
pub struct TallyServer {
    config: ServerConfig,
    store: Arc<dyn RecordStore>,
}

impl TallyServer {
    /// Open (creating or repairing) the configured score file.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = FileRecordStore::open(&config.db_path)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Serve from an already-initialized store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn RecordStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(Arc::clone(&self.store), self.config.top_n);
        build_router(state, self.config.permissive_cors)
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            db = %self.config.db_path.display(),
            "Tally server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
