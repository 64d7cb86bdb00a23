//! The HTML page shown to browser clients.
//!
//! The page is the built frontend's `index.html`. It carries one slot,
//! written `{{ .Data }}` (inner whitespace optional), that receives the
//! subscription text verbatim.

use std::fs;
use std::path::Path;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const SLOT: &str = ".Data";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Data,
}

/// A pre-split page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    segments: Vec<Segment>,
}

impl PageTemplate {
    /// Split `source` around every `Data` slot. Other `{{ ... }}` runs are kept as text.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            let after_open = &rest[start + OPEN.len()..];
            let Some(end) = after_open.find(CLOSE) else {
                break;
            };

            text.push_str(&rest[..start]);
            if after_open[..end].trim() == SLOT {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Data);
            } else {
                text.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]);
            }
            rest = &after_open[end + CLOSE.len()..];
        }

        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Self { segments }
    }

    /// Read and parse a template file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let source = fs::read_to_string(path)?;
        let template = Self::parse(&source);
        if template.slot_count() == 0 {
            tracing::warn!(path = %path.display(), "Page template has no Data slot");
        }
        Ok(template)
    }

    /// Number of `Data` slots.
    pub fn slot_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Data)).count()
    }

    /// Fill every slot with `data`.
    pub fn render(&self, data: &str) -> String {
        let mut out = String::with_capacity(
            self.segments
                .iter()
                .map(|s| match s {
                    Segment::Text(t) => t.len(),
                    Segment::Data => data.len(),
                })
                .sum(),
        );
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Data => out.push_str(data),
            }
        }
        out
    }
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::parse(concat!(
            "<!doctype html>\n",
            "<html><head><meta charset=\"utf-8\"><title>Subscription</title></head>\n",
            "<body><pre id=\"subscription\">{{ .Data }}</pre></body></html>\n",
        ))
    }
}
