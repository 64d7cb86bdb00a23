//! hyper-based upstream client.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, Uri},
};
use futures_util::future::BoxFuture;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::GatewayError;
use crate::pipeline::headers::HeaderMultiMap;
use crate::upstream::{UpstreamClient, UpstreamResponse, SHORT_ID_PLACEHOLDER};

/// Characters escaped when the identifier is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Errors raised while building the client.
#[derive(Debug, Error)]
pub enum UpstreamInitError {
    #[error("invalid upstream base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] rustls::Error),
}

/// Fetches subscriptions over HTTP or HTTPS with a pooled hyper client.
#[derive(Clone)]
pub struct HyperUpstream {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    base: String,
    path_template: String,
    timeout: Option<Duration>,
}

impl HyperUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamInitError> {
        let base = Url::parse(&config.base_url)?;

        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));

        let root_store: rustls::RootCertStore =
            webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
        let tls_config = rustls::ClientConfig::builder_with_provider(
            rustls::crypto::aws_lc_rs::default_provider().into(),
        )
        .with_safe_default_protocol_versions()?
        .with_root_certificates(root_store)
        .with_no_client_auth();

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            base: base.as_str().trim_end_matches('/').to_string(),
            path_template: config.path_template.clone(),
            timeout: (config.request_timeout_secs > 0)
                .then(|| Duration::from_secs(config.request_timeout_secs)),
        })
    }

    /// Full upstream URI for a short identifier.
    pub fn target_uri(&self, short_id: &str) -> Result<Uri, GatewayError> {
        let encoded = utf8_percent_encode(short_id, PATH_SEGMENT).to_string();
        let path = self.path_template.replace(SHORT_ID_PLACEHOLDER, &encoded);
        format!("{}{}", self.base, path)
            .parse::<Uri>()
            .map_err(|e| GatewayError::UpstreamTransport(format!("invalid upstream URI: {e}")))
    }

    fn build_request(
        &self,
        short_id: &str,
        headers: &HeaderMultiMap,
    ) -> Result<Request<Body>, GatewayError> {
        let mut req = Request::builder()
            .method(Method::GET)
            .uri(self.target_uri(short_id)?);

        if let Some(out) = req.headers_mut() {
            for (name, values) in headers.iter() {
                // The authority comes from the target URI.
                if *name == header::HOST {
                    continue;
                }
                for value in values {
                    out.append(name.clone(), value.clone());
                }
            }
        }

        req.body(Body::empty())
            .map_err(|e| GatewayError::UpstreamTransport(e.to_string()))
    }
}

impl UpstreamClient for HyperUpstream {
    fn fetch<'a>(
        &'a self,
        short_id: &'a str,
        headers: &'a HeaderMultiMap,
    ) -> BoxFuture<'a, Result<UpstreamResponse, GatewayError>> {
        Box::pin(async move {
            let req = self.build_request(short_id, headers)?;
            let uri = req.uri().clone();

            let result = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, self.client.request(req))
                    .await
                    .map_err(|_| {
                        let secs = limit.as_secs();
                        GatewayError::UpstreamTransport(format!("timed out after {secs}s"))
                    })?,
                None => self.client.request(req).await,
            };

            let response = result.map_err(|e| GatewayError::UpstreamTransport(e.to_string()))?;

            tracing::debug!(
                uri = %uri,
                status = %response.status(),
                "Upstream responded"
            );

            let (parts, body) = response.into_parts();
            Ok(UpstreamResponse {
                status: parts.status,
                headers: HeaderMultiMap::from(&parts.headers),
                body: Body::new(body),
            })
        })
    }
}
