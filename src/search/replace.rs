//! Replacement
//!
//! Single replacements splice one verified match span. Bulk replacement
//! scans once and splices from the highest position down, so offsets of
//! not-yet-processed matches stay valid while the text shifts.

use super::matcher::Match;
use super::pattern::CompiledPattern;
use super::scope::{scan_scoped, SearchScope};
use crate::error::{Error, Result};
use log::{debug, info};

/// Result of replacing a single match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    /// The document text after the replacement
    pub text: String,
    /// Byte offset just past the inserted text
    pub end: usize,
    /// Signed change in document length
    pub delta: isize,
}

/// Result of a replace-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceAllOutcome {
    /// The document text after all replacements
    pub text: String,
    /// Number of replacements, equal to the matches found before replacing
    pub count: usize,
    /// Matches of the pattern left in the new text, inside the adjusted scope
    pub remaining: usize,
    /// The scope adjusted for the length change, if one was given
    pub scope: Option<SearchScope>,
}

/// Executes single and bulk replacements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceEngine;

impl ReplaceEngine {
    /// Replace exactly the span of `m` with `replacement`.
    ///
    /// # Errors
    ///
    /// Returns `Error::StaleMatch` if the span is out of bounds, not on a
    /// character boundary, or no longer holds the matched text.
    pub fn replace_one(&self, document: &str, m: &Match, replacement: &str) -> Result<Replaced> {
        let stale = || Error::StaleMatch {
            position: m.position,
        };
        let current = document.get(m.range()).ok_or_else(stale)?;
        if current != m.content {
            return Err(stale());
        }

        let mut text = String::with_capacity(document.len() + replacement.len());
        text.push_str(&document[..m.position]);
        text.push_str(replacement);
        text.push_str(&document[m.end()..]);

        debug!(
            "Replaced match at {} ({} bytes) with {} bytes",
            m.position,
            m.length,
            replacement.len()
        );

        Ok(Replaced {
            text,
            end: m.position + replacement.len(),
            delta: replacement.len() as isize - m.length as isize,
        })
    }

    /// Replace every match of `pattern` within `scope`.
    ///
    /// The match set is computed once, so `count` always equals what a
    /// find-all showed just before. Matches that only appear once the
    /// replacements are spliced in (removing "ab" from "aabb") are not
    /// replaced; they are reported in `remaining` and a further replace-all
    /// picks them up.
    pub fn replace_all(
        &self,
        document: &str,
        pattern: &CompiledPattern,
        scope: Option<SearchScope>,
        replacement: &str,
    ) -> ReplaceAllOutcome {
        let scope = scope.map(|s| s.clamp(document));
        let set = scan_scoped(document, scope, pattern);

        let mut text = document.to_string();
        for m in set.iter().rev() {
            text.replace_range(m.range(), replacement);
        }

        let removed: usize = set.iter().map(|m| m.length).sum();
        let inserted = set.len() * replacement.len();
        let scope = scope.map(|s| s.shifted(inserted as isize - removed as isize));
        let count = set.len();

        let remaining = if count == 0 {
            0
        } else {
            scan_scoped(&text, scope, pattern).len()
        };
        if remaining > 0 {
            debug!(
                "{} matches of '{}' remain after replacing",
                remaining,
                pattern.pattern().as_str()
            );
        }
        info!(
            "Replaced {} occurrence{} of '{}'",
            count,
            if count == 1 { "" } else { "s" },
            pattern.pattern().as_str()
        );

        ReplaceAllOutcome {
            text,
            count,
            remaining,
            scope,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
