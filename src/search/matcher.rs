//! Match scanning
//!
//! Produces every occurrence of a compiled pattern in a text, in strictly
//! increasing position order and without overlap. A zero-width match is
//! recorded as such, and the scan then steps forward one character so a
//! pattern like `x*` always terminates.

use super::pattern::{compile, CompiledPattern, Pattern, SearchOptions};
use crate::error::Result;
use crate::string_utils::next_char_boundary;
use log::debug;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

// ─────────────────────────────────────────────────────────────────────────────
// Match
// ─────────────────────────────────────────────────────────────────────────────

/// A single located occurrence of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Byte offset of the match in the document
    pub position: usize,
    /// Length of the match in bytes (may be zero)
    pub length: usize,
    /// The matched text
    pub content: String,
}

impl Match {
    /// Byte offset one past the end of the match.
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    /// The byte range covered by the match.
    pub fn range(&self) -> Range<usize> {
        self.position..self.end()
    }

    /// Whether the match is zero-width.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The same match moved by `offset` bytes.
    pub(crate) fn shifted(mut self, offset: usize) -> Self {
        self.position += offset;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of the exact document text a match set was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSnapshot {
    len: usize,
    hash: u64,
}

impl TextSnapshot {
    /// Fingerprint `text`.
    pub fn of(text: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        Self {
            len: text.len(),
            hash: hasher.finish(),
        }
    }

    /// Whether `text` is the text this snapshot was taken of.
    pub fn matches(&self, text: &str) -> bool {
        self.len == text.len() && *self == Self::of(text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match Set
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered matches tied to the document text they were computed from.
///
/// A match set is never patched after the document changes. Check
/// [`MatchSet::is_current_for`] and rescan instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    matches: Vec<Match>,
    snapshot: TextSnapshot,
}

impl MatchSet {
    /// Create a match set for `document`.
    pub fn new(matches: Vec<Match>, document: &str) -> Self {
        debug_assert!(matches.windows(2).all(|w| w[0].position < w[1].position));
        Self {
            matches,
            snapshot: TextSnapshot::of(document),
        }
    }

    /// An empty match set for `document`.
    pub fn empty_for(document: &str) -> Self {
        Self::new(Vec::new(), document)
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether there are no matches.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Get a match by index.
    pub fn get(&self, index: usize) -> Option<&Match> {
        self.matches.get(index)
    }

    /// Iterate over the matches in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    /// The matches as a slice.
    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }

    /// Match start positions, in order.
    pub fn positions(&self) -> Vec<usize> {
        self.matches.iter().map(|m| m.position).collect()
    }

    /// Index of the first match starting at or after `offset`.
    pub fn first_at_or_after(&self, offset: usize) -> Option<usize> {
        self.matches.iter().position(|m| m.position >= offset)
    }

    /// The snapshot of the text this set was computed from.
    pub fn snapshot(&self) -> TextSnapshot {
        self.snapshot
    }

    /// Whether this set still describes `document`.
    pub fn is_current_for(&self, document: &str) -> bool {
        self.snapshot.matches(document)
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanning
// ─────────────────────────────────────────────────────────────────────────────

/// Find every match of `pattern` in `text`.
///
/// Positions are relative to `text`. Each search resumes at the end of the
/// previous match; after a zero-width match it resumes one character later.
pub fn scan_matches(text: &str, pattern: &CompiledPattern) -> Vec<Match> {
    let regex = pattern.regex();
    let mut matches = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(found) = regex.find_at(text, pos) else {
            break;
        };

        matches.push(Match {
            position: found.start(),
            length: found.len(),
            content: found.as_str().to_string(),
        });

        pos = if found.is_empty() {
            next_char_boundary(text, found.end())
        } else {
            found.end()
        };
    }

    debug!(
        "Scanned {} bytes for '{}': {} matches",
        text.len(),
        pattern.pattern().as_str(),
        matches.len()
    );
    matches
}

/// Scan a whole document and tie the result to it.
pub fn scan(document: &str, pattern: &CompiledPattern) -> MatchSet {
    MatchSet::new(scan_matches(document, pattern), document)
}

/// Compile and scan in one step.
///
/// # Errors
///
/// Returns the compile error (`EmptySearchTerm` or `InvalidPattern`) so the
/// caller can report it; nothing is scanned in that case.
pub fn find_all(document: &str, pattern: &Pattern, options: SearchOptions) -> Result<MatchSet> {
    let compiled = compile(pattern, options)?;
    Ok(scan(document, &compiled))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
