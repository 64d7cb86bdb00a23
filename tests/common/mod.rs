//! Shared utilities for integration testing.

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use flate2::write::GzEncoder;
use flate2::Compression;
use subscription_gateway::config::GatewayConfig;
use subscription_gateway::pipeline::classifier::ClientClassifier;
use subscription_gateway::pipeline::template::PageTemplate;
use subscription_gateway::upstream::HyperUpstream;
use subscription_gateway::{HttpServer, Shutdown, SubscriptionPipeline};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const PAGE: &str = concat!(
    "<!doctype html><html><body>",
    "<script id=\"sub\" type=\"text/plain\">{{ .Data }}</script>",
    "</body></html>",
);

/// Serve `app` on an ephemeral loopback port.
pub async fn start_upstream(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A running gateway instance.
pub struct Gateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), std::io::Error>>,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a gateway pointed at `upstream`.
pub async fn start_gateway(
    upstream: SocketAddr,
    tweak: impl FnOnce(&mut GatewayConfig),
) -> Gateway {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{upstream}");
    config.page.assets_dir = None;
    tweak(&mut config);

    let pipeline = SubscriptionPipeline::new(
        Arc::new(HyperUpstream::new(&config.upstream).unwrap()),
        ClientClassifier::new(config.page.browser_signatures.iter().cloned()),
        PageTemplate::parse(PAGE),
        config.upstream.max_body_bytes,
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, pipeline);
    let task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    Gateway { addr, shutdown, task }
}

/// Plain reqwest client; it never decodes bodies on its own.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
