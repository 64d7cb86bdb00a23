//! Reversal of the upstream `Content-Encoding`.
//!
//! Only `gzip` is decoded. Any other (or missing) encoding passes the body
//! through untouched.

use std::io::Read;

use axum::body::Bytes;
use axum::http::HeaderValue;
use flate2::read::MultiGzDecoder;

use crate::error::GatewayError;

/// How the upstream body has to be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Gzip,
    Identity,
}

impl BodyEncoding {
    /// Read the encoding from a `Content-Encoding` value.
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        match value.and_then(|v| v.to_str().ok()).map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("gzip") => BodyEncoding::Gzip,
            _ => BodyEncoding::Identity,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyEncoding::Gzip => "gzip",
            BodyEncoding::Identity => "identity",
        }
    }
}

/// Decode a fully read upstream body.
pub fn decode_body(encoding: BodyEncoding, raw: Bytes) -> Result<Bytes, GatewayError> {
    match encoding {
        BodyEncoding::Identity => Ok(raw),
        BodyEncoding::Gzip => gunzip(&raw).map(Bytes::from),
    }
}

/// A bad gzip header is an init failure; anything after it is a read failure.
fn gunzip(raw: &[u8]) -> Result<Vec<u8>, GatewayError> {
    if raw.is_empty() {
        return Err(GatewayError::DecompressionInit("empty gzip stream".into()));
    }

    let mut decoder = MultiGzDecoder::new(raw);
    let mut out = Vec::with_capacity(raw.len() * 4);
    match decoder.read_to_end(&mut out) {
        Ok(_) => Ok(out),
        Err(e) if decoder.header().is_none() => {
            Err(GatewayError::DecompressionInit(e.to_string()))
        }
        Err(e) => Err(GatewayError::UpstreamBodyRead(e.to_string())),
    }
}
