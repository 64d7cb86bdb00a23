//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and path shapes
//! - Validate value ranges (timeouts > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::upstream::SHORT_ID_PLACEHOLDER;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("listener.tls paths must not be empty")]
    TlsPaths,

    #[error("upstream.base_url `{0}` must be an http(s) URL with a host")]
    BaseUrl(String),

    #[error("upstream.path_template `{0}` must start with `/` and contain {{short_id}}")]
    PathTemplate(String),

    #[error("upstream.max_body_bytes must be greater than zero")]
    MaxBodyBytes,

    #[error("route.prefix `{0}` must be empty or start with `/` without a trailing `/`")]
    RoutePrefix(String),

    #[error("page.browser_signatures must be non-empty and contain no empty entries")]
    BrowserSignatures,

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() || tls.key_path.is_empty() {
            errors.push(ValidationError::TlsPaths);
        }
    }

    let base_ok = Url::parse(&config.upstream.base_url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false);
    if !base_ok {
        errors.push(ValidationError::BaseUrl(config.upstream.base_url.clone()));
    }

    let template = &config.upstream.path_template;
    if !template.starts_with('/') || !template.contains(SHORT_ID_PLACEHOLDER) {
        errors.push(ValidationError::PathTemplate(template.clone()));
    }
    if config.upstream.max_body_bytes == 0 {
        errors.push(ValidationError::MaxBodyBytes);
    }

    let prefix = &config.route.prefix;
    if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
        errors.push(ValidationError::RoutePrefix(prefix.clone()));
    }

    let signatures = &config.page.browser_signatures;
    if signatures.is_empty() || signatures.iter().any(|s| s.is_empty()) {
        errors.push(ValidationError::BrowserSignatures);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
