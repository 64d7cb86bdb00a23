//! Client-type classification from the `User-Agent` header.
//!
//! Substring matching is case-sensitive: subscription apps tend to send
//! lowercase product tokens while browsers send the capitalised ones below.

/// Substrings that mark an interactive browser.
pub const DEFAULT_BROWSER_SIGNATURES: [&str; 8] = [
    "Mozilla",
    "Chrome",
    "Safari",
    "Firefox",
    "Opera",
    "Edge",
    "TelegramBot",
    "WhatsApp",
];

/// Decides whether a request comes from a browser or a programmatic client.
#[derive(Debug, Clone)]
pub struct ClientClassifier {
    signatures: Vec<String>,
}

impl ClientClassifier {
    pub fn new<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            signatures: signatures
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// True when any signature occurs in `user_agent`.
    pub fn is_browser(&self, user_agent: &str) -> bool {
        !user_agent.is_empty() && self.signatures.iter().any(|s| user_agent.contains(s.as_str()))
    }
}

impl Default for ClientClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_BROWSER_SIGNATURES)
    }
}
