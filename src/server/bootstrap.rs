use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::room::{RoomRegistry, RoomTiming};

use super::routes::HoldemServer;

const LOG_TARGET: &str = "server::bootstrap";

/// Process-wide configuration, per spec.md §6: bind address, CORS origin,
/// and the two pacing delays. No persisted state, no database handle.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub cors_origin: Option<String>,
    pub showdown_delay: Duration,
    pub auto_advance_step: Duration,
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let timing = RoomTiming {
        auto_advance_step: config.auto_advance_step,
        showdown_delay: config.showdown_delay,
    };
    let rooms = RoomRegistry::new(timing);

    let server = HoldemServer::new(rooms, config.cors_origin.clone());
    let router = server.into_router();
    let make_service = router.into_make_service();

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let local_addr = listener.local_addr()?;
    info!(target = LOG_TARGET, %local_addr, "holdem server listening");

    axum::serve(listener, make_service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target = LOG_TARGET, error = %err, "failed to install ctrl-c handler");
    }
    info!(target = LOG_TARGET, "shutdown signal received");
}
