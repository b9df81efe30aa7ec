//! Current-match cursor
//!
//! Tracks which match is selected. Navigation wraps in both directions
//! and never produces an index outside the match set. After a replacement
//! the cursor is re-anchored against the freshly scanned set so that
//! "replace next" keeps moving forward through the document.

use super::matcher::MatchSet;

/// The selected match index over a match set.
///
/// `None` is the `Empty` state (no match selected). A cursor is only
/// meaningful together with the match set it was last reset or
/// re-anchored against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCursor {
    current: Option<usize>,
}

impl MatchCursor {
    /// Create a cursor with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected index, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Whether no match is selected.
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Reset after a fresh `find_all`: the first match is selected, or
    /// nothing when the set is empty.
    pub fn reset_for(&mut self, matches: &MatchSet) {
        self.current = if matches.is_empty() { None } else { Some(0) };
    }

    /// Drop the selection.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Move to the next match, wrapping to the first.
    ///
    /// Returns the new index, or `None` if there are no matches.
    pub fn next(&mut self, matches: &MatchSet) -> Option<usize> {
        let len = matches.len();
        if len == 0 {
            self.current = None;
            return None;
        }
        let next = match self.current {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.current = Some(next);
        self.current
    }

    /// Move to the previous match, wrapping to the last.
    ///
    /// Returns the new index, or `None` if there are no matches.
    pub fn previous(&mut self, matches: &MatchSet) -> Option<usize> {
        let len = matches.len();
        if len == 0 {
            self.current = None;
            return None;
        }
        let prev = match self.current {
            Some(i) => (i.min(len - 1) + len - 1) % len,
            None => len - 1,
        };
        self.current = Some(prev);
        self.current
    }

    /// Re-anchor after a replacement that ended at byte offset `after`.
    ///
    /// Selects the first match starting at or after `after`; wraps to the
    /// first match if none does; becomes empty if no matches remain.
    pub fn reanchor(&mut self, matches: &MatchSet, after: usize) -> Option<usize> {
        self.current = matches
            .first_at_or_after(after)
            .or_else(|| if matches.is_empty() { None } else { Some(0) });
        self.current
    }

    /// Live counter text: `"current/total"`, or `"No matches"`.
    pub fn counter(&self, matches: &MatchSet) -> String {
        if matches.is_empty() {
            "No matches".to_string()
        } else {
            let shown = self.current.map(|i| i + 1).unwrap_or(0);
            format!("{}/{}", shown, matches.len())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::matcher::find_all;
    use crate::search::pattern::{Pattern, SearchOptions};

    fn matches(text: &str, needle: &str) -> MatchSet {
        find_all(text, &Pattern::new(needle, false), SearchOptions::default()).unwrap()
    }

    #[test]
    fn test_reset_selects_first() {
        let set = matches("axbxcx", "x");
        let mut cursor = MatchCursor::new();
        cursor.reset_for(&set);
        assert_eq!(cursor.current(), Some(0));

        cursor.reset_for(&matches("abc", "x"));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_next_wraps() {
        let set = matches("axbxcx", "x");
        let mut cursor = MatchCursor::new();
        cursor.reset_for(&set);

        assert_eq!(cursor.next(&set), Some(1));
        assert_eq!(cursor.next(&set), Some(2));
        assert_eq!(cursor.next(&set), Some(0));
    }

    #[test]
    fn test_previous_wraps() {
        let set = matches("axbxcx", "x");
        let mut cursor = MatchCursor::new();
        cursor.reset_for(&set);

        assert_eq!(cursor.previous(&set), Some(2));
        assert_eq!(cursor.previous(&set), Some(1));
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let set = matches("x x x x x", "x");
        let mut cursor = MatchCursor::new();
        cursor.reset_for(&set);
        let first = cursor.next(&set);

        for _ in 0..set.len() {
            cursor.next(&set);
        }
        assert_eq!(cursor.current(), first);
    }

    #[test]
    fn test_next_then_previous_restores() {
        let set = matches("x x x", "x");
        let mut cursor = MatchCursor::new();
        cursor.reset_for(&set);
        let start = cursor.current();

        cursor.next(&set);
        cursor.previous(&set);
        assert_eq!(cursor.current(), start);
    }

    #[test]
    fn test_navigation_from_none() {
        let set = matches("x x x", "x");
        let mut cursor = MatchCursor::new();
        assert_eq!(cursor.next(&set), Some(0));

        let mut cursor = MatchCursor::new();
        assert_eq!(cursor.previous(&set), Some(2));
    }

    #[test]
    fn test_navigation_on_empty_set() {
        let set = matches("abc", "x");
        let mut cursor = MatchCursor::new();
        assert_eq!(cursor.next(&set), None);
        assert_eq!(cursor.previous(&set), None);
    }

    #[test]
    fn test_reanchor_moves_forward() {
        // After replacing the first "cat" with "dog" (ending at 3),
        // the remaining match is at 8.
        let set = matches("dog bat cat", "cat");
        let mut cursor = MatchCursor::new();
        assert_eq!(cursor.reanchor(&set, 3), Some(0));
        assert_eq!(set.get(0).unwrap().position, 8);
    }

    #[test]
    fn test_reanchor_skips_earlier_matches() {
        let set = matches("cat cat cat", "cat");
        let mut cursor = MatchCursor::new();
        assert_eq!(cursor.reanchor(&set, 5), Some(2));
    }

    #[test]
    fn test_reanchor_wraps_to_first() {
        let set = matches("cat dog", "cat");
        let mut cursor = MatchCursor::new();
        assert_eq!(cursor.reanchor(&set, 6), Some(0));
    }

    #[test]
    fn test_reanchor_empty() {
        let set = matches("dog dog", "cat");
        let mut cursor = MatchCursor::new();
        cursor.current = Some(1);
        assert_eq!(cursor.reanchor(&set, 0), None);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_counter() {
        let set = matches("x x x", "x");
        let mut cursor = MatchCursor::new();
        cursor.reset_for(&set);
        cursor.next(&set);
        assert_eq!(cursor.counter(&set), "2/3");
        assert_eq!(cursor.counter(&matches("abc", "x")), "No matches");
    }
}
