//! HTTP surface of the scanner
//!
//! Exposes `POST /scan` plus a usage hint at `/` and a liveness check at `/healthz`.
//! The server holds no state between requests beyond the process-wide configuration.

mod errors;
mod handlers;
mod routes;

pub use errors::ApiError;
pub use routes::router;

use crate::config::{Config, ScannerConfig};
use crate::scanner::BatchOrchestrator;
use crate::SweepError;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared, read-only handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub orchestrator: Arc<BatchOrchestrator>,
    pub scanner_config: Arc<ScannerConfig>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, SweepError> {
        Ok(Self {
            orchestrator: Arc::new(BatchOrchestrator::new(config)?),
            scanner_config: Arc::new(config.scanner.clone()),
        })
    }
}

/// Binds the configured address and serves until Ctrl-C
pub async fn serve(config: &Config) -> Result<(), SweepError> {
    let app = router(AppState::new(config)?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    tracing::info!(
        "Worker ceiling {}, request timeout {:?}",
        config.scanner.max_concurrency,
        config.scanner.request_timeout()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
