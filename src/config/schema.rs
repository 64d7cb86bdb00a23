//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the subscription gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Upstream subscription API settings.
    pub upstream: UpstreamConfig,

    /// Inbound route settings.
    pub route: RouteConfig,

    /// Browser page settings (template, assets, client detection).
    pub page: PageConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3010").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3010".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Where and how subscriptions are fetched.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the subscription API (scheme, host, optional port).
    pub base_url: String,

    /// Path of the subscription resource; `{short_id}` is substituted.
    pub path_template: String,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Bound on the whole upstream exchange in seconds. 0 leaves it to the transport.
    pub request_timeout_secs: u64,

    /// Largest upstream body (before decompression) the gateway will buffer.
    pub max_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            path_template: "/api/sub/{short_id}".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 0,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Inbound route configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteConfig {
    /// Path prefix in front of `/{short_id}`. Empty mounts at the root.
    pub prefix: String,
}

/// Browser-facing page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// HTML template rendered for browser clients.
    pub template_path: String,

    /// Directory served under `/assets`, if any.
    pub assets_dir: Option<String>,

    /// User-Agent substrings that identify an interactive browser.
    pub browser_signatures: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            template_path: "./dist/index.html".to_string(),
            assets_dir: Some("./dist/assets".to_string()),
            browser_signatures: crate::pipeline::classifier::DEFAULT_BROWSER_SIGNATURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output style.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log line style.
    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics listener address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
