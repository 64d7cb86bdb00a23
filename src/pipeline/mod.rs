//! Subscription response pipeline.
//!
//! # Data Flow
//! ```text
//! short id + request headers
//!     → identifier check (empty → 400, no upstream call)
//!     → header capture (ordered multi-map)
//!     → upstream fetch (transport error → 500)
//!     → decode.rs (gzip reversal, malformed header → 500)
//!     → body materialization (read error → 500)
//!     → classifier.rs
//!         browser → template.rs (HTML page, upstream headers dropped)
//!         api     → headers.rs (upstream headers, filtered set collapsed)
//! ```
//!
//! # Design Decisions
//! - No state survives a request; the pipeline is shared read-only
//! - The upstream body is owned by the pipeline and dropped on every path
//! - Failures become a fixed-text response; details only go to logs

pub mod classifier;
pub mod decode;
pub mod headers;
pub mod template;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::error::GatewayError;
use crate::observability::metrics;
use crate::upstream::{UpstreamClient, UpstreamResponse};

use classifier::ClientClassifier;
use decode::{decode_body, BodyEncoding};
use headers::{programmatic_headers, HeaderMultiMap};
use template::PageTemplate;

/// Which kind of response a request received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Browser,
    Api,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Browser => "browser",
            Branch::Api => "api",
        }
    }
}

/// Turns one inbound subscription request into one response.
#[derive(Clone)]
pub struct SubscriptionPipeline {
    upstream: Arc<dyn UpstreamClient>,
    classifier: Arc<ClientClassifier>,
    template: Arc<PageTemplate>,
    max_body_bytes: usize,
}

impl SubscriptionPipeline {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        classifier: ClientClassifier,
        template: PageTemplate,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            upstream,
            classifier: Arc::new(classifier),
            template: Arc::new(template),
            max_body_bytes,
        }
    }

    /// Serve a request, converting any failure into its error response.
    pub async fn handle(&self, short_id: &str, request_headers: &HeaderMap) -> Response {
        let start = Instant::now();

        match self.run(short_id, request_headers).await {
            Ok((branch, response)) => {
                tracing::info!(
                    short_id = %short_id,
                    branch = branch.as_str(),
                    status = response.status().as_u16(),
                    "Subscription served"
                );
                metrics::record_request(branch.as_str(), response.status().as_u16(), start);
                response
            }
            Err(err) => {
                match &err {
                    GatewayError::BadRequest => {
                        tracing::warn!(error = %err, "Rejected subscription request")
                    }
                    _ => tracing::error!(
                        short_id = %short_id,
                        kind = err.kind(),
                        error = %err,
                        "Subscription request failed"
                    ),
                }
                metrics::record_error(err.kind());
                metrics::record_request("error", err.status().as_u16(), start);
                err.into_response()
            }
        }
    }

    /// Run the pipeline, returning the chosen branch and its response.
    pub async fn run(
        &self,
        short_id: &str,
        request_headers: &HeaderMap,
    ) -> Result<(Branch, Response), GatewayError> {
        if short_id.is_empty() {
            return Err(GatewayError::BadRequest);
        }

        let captured = HeaderMultiMap::from(request_headers);
        let UpstreamResponse {
            status,
            headers: upstream_headers,
            body,
        } = self.upstream.fetch(short_id, &captured).await?;

        let encoding =
            BodyEncoding::from_header(upstream_headers.get(header::CONTENT_ENCODING.as_str()));
        let data = self.materialize(encoding, body).await?;

        let user_agent = request_headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if self.classifier.is_browser(user_agent) {
            let page = self.template.render(&String::from_utf8_lossy(&data));
            return Ok((Branch::Browser, Html(page).into_response()));
        }

        Ok((Branch::Api, api_response(status, &upstream_headers, data)))
    }

    /// Read the upstream body to the end and reverse its encoding.
    ///
    /// `body` is consumed here whatever the outcome.
    async fn materialize(
        &self,
        encoding: BodyEncoding,
        body: Body,
    ) -> Result<axum::body::Bytes, GatewayError> {
        let raw = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|e| GatewayError::UpstreamBodyRead(e.to_string()))?;

        tracing::debug!(
            encoding = encoding.as_str(),
            raw_len = raw.len(),
            "Upstream body read"
        );
        decode_body(encoding, raw)
    }
}

fn api_response(
    status: StatusCode,
    upstream_headers: &HeaderMultiMap,
    data: axum::body::Bytes,
) -> Response {
    let mut response = Response::new(Body::from(data));
    *response.status_mut() = status;
    *response.headers_mut() = programmatic_headers(upstream_headers);
    response
}
