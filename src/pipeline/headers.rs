//! Ordered header multi-map and the filtered header set.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

/// Upstream headers collapsed to a single comma-joined value for
/// programmatic clients.
pub const FILTERED_HEADERS: [&str; 5] = [
    "profile-title",
    "profile-update-interval",
    "subscription-userinfo",
    "profile-web-page-url",
    "content-disposition",
];

/// Value forced onto `Content-Encoding` of programmatic responses.
///
/// The body sent alongside it is the decompressed payload, so the pair does
/// not agree. Kept as-is until the consuming apps are checked.
pub const FORCED_CONTENT_ENCODING: &str = "application/gzip";

/// Framing headers that describe the upstream wire body, not ours.
const FRAMING_HEADERS: [HeaderName; 4] = [
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
];

/// Header names mapped to their values, in first-seen order.
///
/// Duplicate names keep every value in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMultiMap {
    entries: Vec<(HeaderName, Vec<HeaderValue>)>,
}

impl HeaderMultiMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value after any values already held for `name`.
    pub fn append(&mut self, name: HeaderName, value: HeaderValue) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// All values for `name`, empty when absent.
    pub fn get_all(&self, name: &str) -> &[HeaderValue] {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str().eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.get_all(name).first()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &[HeaderValue])> {
        self.entries.iter().map(|(n, v)| (n, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values of `name` joined with `,`, or `None` when absent or not joinable.
    pub fn joined(&self, name: &str) -> Option<HeaderValue> {
        let values = self.get_all(name);
        if values.is_empty() {
            return None;
        }
        let mut joined = Vec::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                joined.push(b',');
            }
            joined.extend_from_slice(value.as_bytes());
        }
        HeaderValue::from_bytes(&joined).ok()
    }
}

impl From<&HeaderMap> for HeaderMultiMap {
    fn from(headers: &HeaderMap) -> Self {
        let mut map = Self::new();
        for (name, value) in headers.iter() {
            map.append(name.clone(), value.clone());
        }
        map
    }
}

impl FromIterator<(HeaderName, HeaderValue)> for HeaderMultiMap {
    fn from_iter<I: IntoIterator<Item = (HeaderName, HeaderValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.append(name, value);
        }
        map
    }
}

/// Build the outgoing header set for a programmatic client.
///
/// Every upstream header is copied with all its values, the filtered set is
/// then overwritten with one comma-joined value each, and `Content-Encoding`
/// is forced last.
pub fn programmatic_headers(upstream: &HeaderMultiMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(upstream.len() + 1);

    for (name, values) in upstream.iter() {
        if FRAMING_HEADERS.contains(name) {
            continue;
        }
        for value in values {
            out.append(name.clone(), value.clone());
        }
    }

    for name in FILTERED_HEADERS {
        if let Some(value) = upstream.joined(name) {
            out.insert(HeaderName::from_static(name), value);
        }
    }

    out.insert(
        header::CONTENT_ENCODING,
        HeaderValue::from_static(FORCED_CONTENT_ENCODING),
    );
    out
}
