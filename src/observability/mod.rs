//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline and HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metrics are cheap and optional

pub mod logging;
pub mod metrics;
