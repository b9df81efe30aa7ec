//! Search scope restriction
//!
//! A scope limits search and replace to `[from, to)` of the document.
//! Scanning happens on the sliced text; every reported position is moved
//! back to document coordinates by adding `from`.

use super::matcher::{scan_matches, MatchSet};
use super::pattern::CompiledPattern;
use crate::string_utils::{ceil_char_boundary, floor_char_boundary};

/// A byte range of the document that search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchScope {
    /// Start offset (inclusive)
    pub from: usize,
    /// End offset (exclusive)
    pub to: usize,
}

impl SearchScope {
    /// Create a scope, normalising reversed bounds.
    pub fn new(from: usize, to: usize) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// Length of the scope in bytes.
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Whether the scope covers no text.
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Clamp the scope to `text`, snapping to character boundaries.
    ///
    /// The start snaps down and the end snaps up so a selection that
    /// starts or ends mid-character still covers that character.
    pub fn clamp(&self, text: &str) -> Self {
        let from = floor_char_boundary(text, self.from);
        let to = ceil_char_boundary(text, self.to).max(from);
        Self { from, to }
    }

    /// The scope after an edit inside it changed its length by `delta` bytes.
    pub fn shifted(&self, delta: isize) -> Self {
        let to = (self.to as isize + delta).max(self.from as isize) as usize;
        Self { from: self.from, to }
    }
}

/// The slice of a document that a scan covers.
#[derive(Debug, Clone, Copy)]
pub struct ScopedText<'a> {
    slice: &'a str,
    offset: usize,
}

impl<'a> ScopedText<'a> {
    /// Restrict `document` to `scope`, or take all of it.
    pub fn new(document: &'a str, scope: Option<SearchScope>) -> Self {
        match scope {
            Some(scope) => {
                let scope = scope.clamp(document);
                Self {
                    slice: &document[scope.from..scope.to],
                    offset: scope.from,
                }
            }
            None => Self {
                slice: document,
                offset: 0,
            },
        }
    }

    /// The text to scan.
    pub fn slice(&self) -> &'a str {
        self.slice
    }

    /// The offset to add to every slice-local position.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Scan `document` within `scope`, reporting document-global positions.
pub fn scan_scoped(
    document: &str,
    scope: Option<SearchScope>,
    pattern: &CompiledPattern,
) -> MatchSet {
    let scoped = ScopedText::new(document, scope);
    let matches = scan_matches(scoped.slice(), pattern)
        .into_iter()
        .map(|m| m.shifted(scoped.offset()))
        .collect();
    MatchSet::new(matches, document)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
