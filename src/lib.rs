//! Subscription Gateway Library
//!
//! Fetches a subscription document from the upstream API for a short
//! identifier and answers with either the rendered subscription page
//! (browsers) or the raw payload plus subscription headers (apps).

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod pipeline;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::SubscriptionPipeline;
