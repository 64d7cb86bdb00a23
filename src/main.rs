//! Subscription Gateway (v1)
//!
//! Serves subscription documents from an upstream panel API.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │             SUBSCRIPTION GATEWAY             │
//!                         │                                              │
//!   GET /{short_id}       │  ┌────────┐   ┌──────────┐   ┌──────────┐    │
//!   ──────────────────────┼─▶│  http  │──▶│ pipeline │──▶│ upstream │────┼──▶ Panel API
//!                         │  │ server │   │          │◀──│  client  │◀───┼───
//!                         │  └────────┘   └────┬─────┘   └──────────┘    │
//!                         │                    │                         │
//!                         │         ┌──────────┴──────────┐              │
//!                         │         ▼                     ▼              │
//!   HTML page /           │   ┌───────────┐        ┌─────────────┐       │
//!   raw subscription      │   │ template  │        │  headers    │       │
//!   ◀─────────────────────┼───│ (browser) │        │   (apps)    │       │
//!                         │   └───────────┘        └─────────────┘       │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use subscription_gateway::config::{load_config, GatewayConfig};
use subscription_gateway::lifecycle::{self, signals, Shutdown};
use subscription_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "subscription-gateway")]
#[command(about = "Serves subscription pages and payloads from the panel API", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "SUBSCRIPTION_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init(config.observability.log_format);

    if cli.check {
        tracing::info!("Configuration is valid");
        return Ok(());
    }

    if rustls::crypto::aws_lc_rs::default_provider().install_default().is_err() {
        tracing::debug!("rustls crypto provider already installed");
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "subscription-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        upstream = %config.upstream.base_url,
        route_prefix = %config.route.prefix,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    lifecycle::start(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
