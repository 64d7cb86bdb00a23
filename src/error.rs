//! Request-scoped failures of the subscription pipeline.
//!
//! Every variant maps to a status code and a fixed body. The detail
//! carried by a variant is for operators only and never reaches the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors that end a request before a subscription could be served.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The short identifier was missing or empty.
    #[error("missing subscription identifier")]
    BadRequest,

    /// The upstream could not be reached (DNS, connect, timeout).
    #[error("upstream transport error: {0}")]
    UpstreamTransport(String),

    /// The upstream body failed after the exchange started.
    #[error("upstream body read error: {0}")]
    UpstreamBodyRead(String),

    /// A body declared as gzip did not start with a valid gzip header.
    #[error("gzip decoder could not be initialized: {0}")]
    DecompressionInit(String),
}

impl GatewayError {
    /// Status code returned to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamTransport(_)
            | GatewayError::UpstreamBodyRead(_)
            | GatewayError::DecompressionInit(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Static body returned to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::BadRequest => "Bad request.",
            GatewayError::UpstreamTransport(_) => "Request error.",
            GatewayError::UpstreamBodyRead(_) => "Read response error.",
            GatewayError::DecompressionInit(_) => "Decompression error.",
        }
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::BadRequest => "bad_request",
            GatewayError::UpstreamTransport(_) => "upstream_transport",
            GatewayError::UpstreamBodyRead(_) => "upstream_body_read",
            GatewayError::DecompressionInit(_) => "decompression_init",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
