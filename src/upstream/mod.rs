//! Upstream subscription API access.
//!
//! # Data Flow
//! ```text
//! short id + captured request headers
//!     → client.rs (build GET {base_url}{path_template}, forward headers)
//!     → UpstreamResponse (status, ordered headers, unread body)
//!     → response pipeline
//! ```
//!
//! # Design Decisions
//! - One request per call, never retried
//! - The body is returned unread; dropping it releases the connection
//! - Transport failures surface as `GatewayError::UpstreamTransport`

pub mod client;

use axum::body::Body;
use axum::http::StatusCode;
use futures_util::future::BoxFuture;

use crate::error::GatewayError;
use crate::pipeline::headers::HeaderMultiMap;

pub use client::{HyperUpstream, UpstreamInitError};

/// Placeholder replaced by the short identifier in the upstream path.
pub const SHORT_ID_PLACEHOLDER: &str = "{short_id}";

/// Raw upstream answer. The body has not been read yet.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMultiMap,
    pub body: Body,
}

impl std::fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Something that can fetch a subscription document.
pub trait UpstreamClient: Send + Sync {
    fn fetch<'a>(
        &'a self,
        short_id: &'a str,
        headers: &'a HeaderMultiMap,
    ) -> BoxFuture<'a, Result<UpstreamResponse, GatewayError>>;
}
