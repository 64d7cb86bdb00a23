//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the pipeline's collaborators from configuration
//! - Start the metrics exporter when enabled
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::pipeline::classifier::ClientClassifier;
use crate::pipeline::template::PageTemplate;
use crate::pipeline::SubscriptionPipeline;
use crate::upstream::{HyperUpstream, UpstreamInitError};

/// Errors that stop the gateway from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load page template {path}: {source}")]
    Template {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Upstream(#[from] UpstreamInitError),

    #[error("invalid address `{0}`")]
    Address(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the subscription pipeline described by `config`.
pub fn build_pipeline(config: &GatewayConfig) -> Result<SubscriptionPipeline, StartupError> {
    let template = PageTemplate::load(Path::new(&config.page.template_path)).map_err(|source| {
        StartupError::Template {
            path: config.page.template_path.clone(),
            source,
        }
    })?;
    let upstream = HyperUpstream::new(&config.upstream)?;

    tracing::info!(
        upstream = %config.upstream.base_url,
        path_template = %config.upstream.path_template,
        template = %config.page.template_path,
        "Pipeline ready"
    );

    Ok(SubscriptionPipeline::new(
        Arc::new(upstream),
        ClientClassifier::new(config.page.browser_signatures.iter().cloned()),
        template,
        config.upstream.max_body_bytes,
    ))
}

/// Start every subsystem and serve until `shutdown` fires.
pub async fn start(config: GatewayConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr);
    }

    let pipeline = build_pipeline(&config)?;
    let bind_address = config.listener.bind_address.clone();
    let tls = config.listener.tls.clone();
    let server = HttpServer::new(config, pipeline);

    match tls {
        Some(tls) => {
            let addr: SocketAddr = bind_address
                .parse()
                .map_err(|_| StartupError::Address(bind_address.clone()))?;
            server.run_tls(addr, &tls, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    Ok(())
}
