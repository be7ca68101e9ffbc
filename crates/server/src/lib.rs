//! DevConnector API Server Library
//!
//! Accounts, profiles and posts over a JSON document store, with
//! JWT session tokens in the `x-auth-token` header.

pub mod core;
pub mod posts;
pub mod profile;

use anyhow::Context;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use crate::core::{router, AppState, Error, Result, ServerConfig};

pub async fn run() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        // Already set, ignore
    }

    info!("=== DevConnector Server ===");

    let state = AppState::open(ServerConfig::from_env()?).await?;
    info!("Data directory: {:?}", state.config.data_dir);
    info!("Stores opened ({} users)", state.users.count().await);

    let port = state.config.port;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://localhost:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
