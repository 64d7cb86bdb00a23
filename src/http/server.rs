//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the subscription route
//! - Serve the frontend assets next to it
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve over plain TCP or TLS with graceful shutdown

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware,
    response::Response,
    Extension,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{GatewayConfig, TlsConfig};
use crate::http::request::{
    self, capture_inbound_headers, propagate_request_id_layer, set_request_id_layer,
    InboundHeaders,
};
use crate::net::tls::load_tls_config;
use crate::pipeline::SubscriptionPipeline;

/// How long in-flight TLS connections get to finish after shutdown.
const TLS_DRAIN: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: SubscriptionPipeline,
}

/// HTTP server for the subscription gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server around an already built pipeline.
    pub fn new(config: GatewayConfig, pipeline: SubscriptionPipeline) -> Self {
        let router = Self::build_router(&config, AppState { pipeline });
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let prefix = config.route.prefix.as_str();

        let mut router = Router::new()
            .route(&format!("{prefix}/{{short_id}}"), get(subscription_handler))
            .route(&format!("{prefix}/"), get(missing_id_handler));
        if !prefix.is_empty() {
            router = router.route(prefix, get(missing_id_handler));
        }
        if let Some(dir) = &config.page.assets_dir {
            router = router.nest_service("/assets", ServeDir::new(dir));
        }

        router
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request::request_id(req.headers()),
                )
            }))
            .layer(set_request_id_layer())
            .layer(middleware::from_fn(capture_inbound_headers))
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on a plain TCP listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: &TlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let rustls = load_tls_config(tls).await?;
        let handle = axum_server::Handle::new();

        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
            drain.graceful_shutdown(Some(TLS_DRAIN));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

async fn subscription_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
    Extension(InboundHeaders(headers)): Extension<InboundHeaders>,
) -> Response {
    tracing::debug!(short_id = %short_id, "Subscription requested");
    state.pipeline.handle(&short_id, &headers).await
}

async fn missing_id_handler(
    State(state): State<AppState>,
    Extension(InboundHeaders(headers)): Extension<InboundHeaders>,
) -> Response {
    state.pipeline.handle("", &headers).await
}
