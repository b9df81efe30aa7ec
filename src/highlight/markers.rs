//! Textual marker highlighting
//!
//! The fallback for hosts without decorations: each match is wrapped in a
//! delimiter pair written into the document itself. Wrapping records where
//! every marker landed so unwrapping restores the text exactly, and a marker
//! that is no longer where it was recorded is skipped rather than guessed at.

use crate::search::Match;
use serde::{Deserialize, Serialize};

/// The delimiter pair wrapped around each highlighted match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Inserted before the match
    pub open: String,
    /// Inserted after the match
    pub close: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            open: "==".to_string(),
            close: "==".to_string(),
        }
    }
}

impl MarkerStyle {
    /// Bytes added around each match.
    pub fn overhead(&self) -> usize {
        self.open.len() + self.close.len()
    }
}

/// Where one match's markers sit in the marked text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpan {
    /// Byte offset of the opening marker
    pub open_at: usize,
    /// Byte offset of the closing marker
    pub close_at: usize,
}

/// Wrap every match of `matches` (computed from `text`) in markers.
pub fn wrap(text: &str, matches: &[Match], style: &MarkerStyle) -> (String, Vec<MarkerSpan>) {
    let mut marked = String::with_capacity(text.len() + matches.len() * style.overhead());
    let mut spans = Vec::with_capacity(matches.len());
    let mut last = 0;

    for m in matches {
        marked.push_str(&text[last..m.position]);
        let open_at = marked.len();
        marked.push_str(&style.open);
        marked.push_str(&text[m.range()]);
        let close_at = marked.len();
        marked.push_str(&style.close);
        spans.push(MarkerSpan { open_at, close_at });
        last = m.end();
    }
    marked.push_str(&text[last..]);

    (marked, spans)
}

/// Remove the markers recorded in `spans`.
///
/// Returns the restored text and how many spans were skipped because their
/// markers were no longer in place.
pub fn unwrap(text: &str, spans: &[MarkerSpan], style: &MarkerStyle) -> (String, usize) {
    let mut restored = text.to_string();
    let mut skipped = 0;

    for span in spans.iter().rev() {
        let close_end = span.close_at + style.close.len();
        let open_end = span.open_at + style.open.len();
        let intact = open_end <= span.close_at
            && restored.get(span.open_at..open_end) == Some(style.open.as_str())
            && restored.get(span.close_at..close_end) == Some(style.close.as_str());

        if intact {
            restored.replace_range(span.close_at..close_end, "");
            restored.replace_range(span.open_at..open_end, "");
        } else {
            skipped += 1;
        }
    }

    (restored, skipped)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
