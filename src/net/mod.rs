//! Network layer subsystem.
//!
//! Plain TCP listeners are bound in `lifecycle::startup` and handed to
//! `axum::serve`. This module holds what the TLS listener needs.
//!
//! # Design Decisions
//! - TLS is optional and terminated in-process via rustls
//! - Certificates are read once at startup

pub mod tls;
