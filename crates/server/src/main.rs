// crates/server/src/main.rs
//! Draftboard server binary.
//!
//! Binds the HTTP listener first, then spawns the retention sweeper; the
//! store holds nothing at startup, so there is no warm-up phase.

use std::net::SocketAddr;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use draftboard_server::{create_app, spawn_sweeper, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftboard=info,tower_http=warn")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env()?;
    let port = config.port;
    let retention = config.retention;
    let sweep_interval = config.sweep_interval;

    let state = AppState::new(config);
    let app = create_app(state.clone());

    // Callbacks arrive from the workflow engine, so bind all interfaces.
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, version = env!("CARGO_PKG_VERSION"), "draftboard listening");

    spawn_sweeper(state.store.clone(), retention, sweep_interval);

    axum::serve(listener, app).await?;
    Ok(())
}
