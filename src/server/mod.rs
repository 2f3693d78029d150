//! HTTP transport for the browser extension.

mod handlers;
mod router;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::pipeline::Pipeline;

pub use router::build_router;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pipeline: Pipeline,
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(host: &str, port: u16, pipeline: Pipeline) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);

    let app = build_router(AppState { pipeline });
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
