use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use holdem_server::server::{run_server, ServerConfig};

/// Multi-table No-Limit Hold'em server.
#[derive(Debug, Parser)]
struct Args {
    /// Address to bind the HTTP/WS server to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Allowed CORS origin; omit to allow any origin.
    #[arg(long, env = "CORS_ORIGIN")]
    cors_origin: Option<String>,

    /// Delay, in milliseconds, between an auto-advance street reveal and
    /// the next one.
    #[arg(long, env = "AUTO_ADVANCE_STEP_MS", default_value_t = 3000)]
    auto_advance_step_ms: u64,

    /// Delay, in milliseconds, the showdown snapshot is held before the
    /// next hand is dealt.
    #[arg(long, env = "SHOWDOWN_DELAY_MS", default_value_t = 2000)]
    showdown_delay_ms: u64,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    init_tracing();

    let args = Args::parse();
    let config = ServerConfig {
        bind: args.bind,
        cors_origin: args.cors_origin,
        auto_advance_step: Duration::from_millis(args.auto_advance_step_ms),
        showdown_delay: Duration::from_millis(args.showdown_delay_ms),
    };

    run_server(config).await.context("server terminated with an error")
}
