//! Search session
//!
//! A `SearchSession` is the state machine behind one find/replace panel. It
//! owns the match set, the cursor, the scope snapshot and the highlight
//! round, and drives them against an [`EditorHost`] it borrows per call.
//!
//! Every operation reports its outcome as a [`Notice`] instead of returning
//! an error: an invalid regex, an empty term or a failed scroll are all
//! ordinary panel feedback. Highlights are always cleared before the text is
//! rescanned or mutated, so marker highlighting can never leak into the
//! matched text or the replacement.

use crate::error::{Error, Result};
use crate::highlight::markers::MarkerStyle;
use crate::highlight::{HighlightManager, HighlightStrategy};
use crate::host::EditorHost;
use crate::search::{
    compile, scan_scoped, CompiledPattern, Match, MatchCursor, MatchSet, Pattern,
    ReplaceEngine, SearchOptions, SearchScope,
};
use crate::string_utils::next_char_boundary;
use log::{debug, info, warn};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Per-session search configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Interpret the search term as a regular expression
    pub use_regex: bool,
    /// Case sensitivity and whole-word matching
    pub options: SearchOptions,
    /// Restrict search and replace to the selection
    pub restrict_to_selection: bool,
    /// Preferred highlight strategy
    pub highlight_strategy: HighlightStrategy,
    /// Delimiters for the marker strategy
    pub marker_style: MarkerStyle,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            use_regex: false,
            options: SearchOptions::default(),
            restrict_to_selection: false,
            highlight_strategy: HighlightStrategy::default(),
            marker_style: MarkerStyle::default(),
        }
    }
}

/// Which fields the panel shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelMode {
    /// Search field only
    #[default]
    Find,
    /// Search and replacement fields
    Replace,
}

// ─────────────────────────────────────────────────────────────────────────────
// Notices
// ─────────────────────────────────────────────────────────────────────────────

/// User-facing feedback from a session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The search term is blank
    EmptySearchTerm,
    /// The search found nothing
    NoMatches,
    /// The regex did not compile
    InvalidPattern(String),
    /// A match could not be selected or scrolled to
    Position(String),
    /// A number of replacements were made
    Replaced(usize),
    /// Anything else that went wrong
    Failed(String),
}

impl Notice {
    /// Whether the notice reports a failure rather than an outcome.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::InvalidPattern(_) | Notice::Position(_) | Notice::Failed(_)
        )
    }
}

impl From<Error> for Notice {
    fn from(err: Error) -> Self {
        match err {
            Error::EmptySearchTerm => Notice::EmptySearchTerm,
            Error::InvalidPattern { message, .. } => Notice::InvalidPattern(message),
            Error::Position { message } => Notice::Position(message),
            other => Notice::Failed(other.to_string()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::EmptySearchTerm => write!(f, "Please enter a search term"),
            Notice::NoMatches => write!(f, "No matches found"),
            Notice::InvalidPattern(msg) => write!(f, "Invalid regular expression: {}", msg),
            Notice::Position(msg) => write!(f, "Failed to scroll to the match: {}", msg),
            Notice::Replaced(1) => write!(f, "Replaced 1 occurrence"),
            Notice::Replaced(n) => write!(f, "Replaced {} occurrences", n),
            Notice::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Find/replace state for one document.
#[derive(Debug)]
pub struct SearchSession {
    config: SessionConfig,
    search_term: String,
    replacement: String,
    mode: PanelMode,
    open: bool,
    scope: Option<SearchScope>,
    matches: MatchSet,
    cursor: MatchCursor,
    highlights: HighlightManager,
    engine: ReplaceEngine,
    /// Host version the match set (and its highlights) were last synced to
    synced_version: Option<u64>,
    notices: Vec<Notice>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SearchSession {
    /// Create a closed session.
    pub fn new(config: SessionConfig) -> Self {
        let highlights = HighlightManager::new(config.highlight_strategy, config.marker_style.clone());
        Self {
            config,
            search_term: String::new(),
            replacement: String::new(),
            mode: PanelMode::Find,
            open: false,
            scope: None,
            matches: MatchSet::empty_for(""),
            cursor: MatchCursor::new(),
            highlights,
            engine: ReplaceEngine::default(),
            synced_version: None,
            notices: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The session's search configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Which fields the panel shows.
    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    /// Whether the panel is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The search term as typed.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// The replacement text, inserted literally.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// The scope snapshot, if search is restricted.
    pub fn scope(&self) -> Option<SearchScope> {
        self.scope
    }

    /// The live match set, in clean-text coordinates.
    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// Index of the current match.
    pub fn current(&self) -> Option<usize> {
        self.cursor.current()
    }

    /// The current match.
    pub fn current_match(&self) -> Option<&Match> {
        self.cursor.current().and_then(|i| self.matches.get(i))
    }

    /// Counter text for the panel: `"i/n"` or `"No matches"`.
    pub fn counter(&self) -> String {
        self.cursor.counter(&self.matches)
    }

    /// Whether highlights are painted.
    pub fn has_highlights(&self) -> bool {
        self.highlights.is_active()
    }

    /// Notices produced since they were last taken.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// The most recent notice.
    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query setters
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the search term. Existing matches become stale.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search_term {
            self.search_term = term;
            self.invalidate();
        }
    }

    /// Set the replacement text.
    pub fn set_replacement(&mut self, replacement: impl Into<String>) {
        self.replacement = replacement.into();
    }

    pub fn set_use_regex(&mut self, use_regex: bool) {
        if self.config.use_regex != use_regex {
            self.config.use_regex = use_regex;
            self.invalidate();
        }
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        if self.config.options.case_sensitive != case_sensitive {
            self.config.options.case_sensitive = case_sensitive;
            self.invalidate();
        }
    }

    pub fn set_whole_word(&mut self, whole_word: bool) {
        if self.config.options.whole_word != whole_word {
            self.config.options.whole_word = whole_word;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.synced_version = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Panel lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Open (or switch) the panel.
    ///
    /// With restriction enabled, the current selection becomes the scope.
    pub fn open(&mut self, host: &mut dyn EditorHost, mode: PanelMode) {
        self.mode = mode;
        if !self.open {
            debug!("Opening search panel in {:?} mode", mode);
            self.open = true;
            if self.config.restrict_to_selection {
                self.capture_scope(host);
            }
        }
    }

    /// Turn selection restriction on or off.
    ///
    /// Turning it on snapshots the host's selection; searching without a
    /// selection covers the whole document.
    pub fn set_restrict_to_selection(&mut self, host: &mut dyn EditorHost, restrict: bool) {
        self.config.restrict_to_selection = restrict;
        if restrict {
            self.capture_scope(host);
        } else {
            self.scope = None;
        }
        self.invalidate();
    }

    fn capture_scope(&mut self, host: &mut dyn EditorHost) {
        self.scope = match host.selected_offsets() {
            Ok(Some(range)) => {
                let from = self.highlights.unmark_offset(range.start);
                let to = self.highlights.unmark_offset(range.end);
                Some(SearchScope::new(from, to))
            }
            Ok(None) => None,
            Err(e) => {
                self.notify(e.into());
                None
            }
        };
        debug!("Search scope: {:?}", self.scope);
    }

    /// Close the panel: clear highlights and forget all matches.
    pub fn close(&mut self, host: &mut dyn EditorHost) {
        self.highlights.clear(host);
        self.matches = MatchSet::empty_for(host.text());
        self.cursor.clear();
        self.synced_version = None;
        self.scope = None;
        self.open = false;
        debug!("Closed search panel");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Find every match, highlight them and select the first.
    pub fn find_all(&mut self, host: &mut dyn EditorHost) {
        if let Err(e) = self.rescan(host) {
            self.notify(e.into());
            return;
        }
        self.cursor.reset_for(&self.matches);
        if self.matches.is_empty() {
            self.notify(Notice::NoMatches);
            return;
        }
        self.paint(host);
        self.reveal_current(host);
    }

    /// Select the next match, wrapping around.
    pub fn next(&mut self, host: &mut dyn EditorHost) {
        self.navigate(host, MatchCursor::next);
    }

    /// Select the previous match, wrapping around.
    pub fn previous(&mut self, host: &mut dyn EditorHost) {
        self.navigate(host, MatchCursor::previous);
    }

    fn navigate(
        &mut self,
        host: &mut dyn EditorHost,
        step: fn(&mut MatchCursor, &MatchSet) -> Option<usize>,
    ) {
        if self.matches.is_empty() || self.is_stale(host) {
            debug!("Rebuilding matches before navigating");
            if let Err(e) = self.rescan(host) {
                self.notify(e.into());
                return;
            }
            self.cursor.clear();
            if self.matches.is_empty() {
                self.notify(Notice::NoMatches);
                return;
            }
            self.paint(host);
        }

        step(&mut self.cursor, &self.matches);
        self.highlights.set_current(host, self.cursor.current());
        self.reveal_current(host);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replace
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the current match and move to the one after it.
    pub fn replace_next(&mut self, host: &mut dyn EditorHost) {
        self.highlights.clear(host);
        if self.synced_version.is_none() || !self.matches.is_current_for(host.text()) {
            if let Err(e) = self.rescan(host) {
                self.notify(e.into());
                return;
            }
        }

        let Some(index) = self.cursor.current().or_else(|| self.cursor.next(&self.matches)) else {
            self.notify(Notice::NoMatches);
            return;
        };
        let Some(target) = self.matches.get(index).cloned() else {
            self.notify(Notice::NoMatches);
            return;
        };

        let end = match self.replace_in_host(host, &target) {
            Ok(end) => end,
            Err(e) => {
                warn!("Replace failed: {}", e);
                self.notify(e.into());
                return;
            }
        };

        if let Err(e) = self.rescan(host) {
            self.notify(e.into());
            return;
        }
        // An empty match would be found again at `end`
        let anchor = if target.length == 0 {
            next_char_boundary(host.text(), end)
        } else {
            end
        };
        self.cursor.reanchor(&self.matches, anchor);
        self.paint(host);
        self.reveal_current(host);
        self.notify(Notice::Replaced(1));
    }

    /// Splice the replacement over `target` with a ranged host edit.
    ///
    /// Returns the offset just past the inserted text.
    fn replace_in_host(&mut self, host: &mut dyn EditorHost, target: &Match) -> Result<usize> {
        let replaced = self.engine.replace_one(host.text(), target, &self.replacement)?;
        let from = host.offset_to_position(target.position)?;
        let to = host.offset_to_position(target.end())?;
        host.replace_range(&self.replacement, from, to)?;
        self.scope = self.scope.map(|s| s.shifted(replaced.delta));
        Ok(replaced.end)
    }

    /// Replace every match in scope.
    pub fn replace_all(&mut self, host: &mut dyn EditorHost) {
        self.highlights.clear(host);
        let pattern = match self.compile() {
            Ok(pattern) => pattern,
            Err(e) => {
                self.notify(e.into());
                return;
            }
        };

        let outcome = self
            .engine
            .replace_all(host.text(), &pattern, self.scope, &self.replacement);
        if outcome.count == 0 {
            self.matches = MatchSet::empty_for(host.text());
            self.cursor.clear();
            self.synced_version = Some(host.version());
            self.notify(Notice::NoMatches);
            return;
        }

        host.set_text(outcome.text);
        self.scope = outcome.scope;
        self.matches = scan_scoped(host.text(), self.scope, &pattern);
        self.synced_version = Some(host.version());
        self.cursor.reset_for(&self.matches);
        self.paint(host);
        self.reveal_current(host);
        self.notify(Notice::Replaced(outcome.count));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host edits
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove every highlight, leaving the panel open.
    ///
    /// The next navigation rebuilds the match set.
    pub fn clear_highlights(&mut self, host: &mut dyn EditorHost) {
        self.highlights.clear(host);
        self.invalidate();
    }

    /// Follow a user edit made while the panel is open.
    ///
    /// Decorations are recomputed quietly and the cursor stays near the
    /// match it was on. Text markers are removed instead, since the user
    /// may have typed inside them.
    pub fn refresh(&mut self, host: &mut dyn EditorHost) {
        if !self.open || !self.highlights.is_active() {
            self.invalidate();
            return;
        }
        if self.highlights.strategy() == HighlightStrategy::Markers || self.highlights.has_markers() {
            debug!("Document edited, removing text markers");
            self.clear_highlights(host);
            return;
        }

        let anchor = self.current_match().map(|m| m.position);
        if let Err(e) = self.rescan(host) {
            debug!("Could not refresh matches: {}", e);
            return;
        }
        if let Some(anchor) = anchor {
            self.cursor.reanchor(&self.matches, anchor);
        }
        if !self.matches.is_empty() {
            self.paint(host);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn compile(&self) -> Result<CompiledPattern> {
        let pattern = Pattern::new(self.search_term.as_str(), self.config.use_regex);
        compile(&pattern, self.config.options)
    }

    fn is_stale(&self, host: &dyn EditorHost) -> bool {
        self.synced_version != Some(host.version())
    }

    /// Clear highlights and rebuild the match set from the host's text.
    ///
    /// On error the match set is left empty.
    fn rescan(&mut self, host: &mut dyn EditorHost) -> Result<()> {
        self.highlights.clear(host);
        self.matches = MatchSet::empty_for(host.text());
        self.cursor.clear();
        self.synced_version = None;

        let pattern = self.compile()?;
        self.matches = scan_scoped(host.text(), self.scope, &pattern);
        self.synced_version = Some(host.version());
        debug!(
            "Found {} matches for '{}'",
            self.matches.len(),
            self.search_term
        );
        Ok(())
    }

    fn paint(&mut self, host: &mut dyn EditorHost) {
        self.highlights.apply(host, &self.matches);
        // Marker highlighting rewrites the text; the matches still describe it
        self.synced_version = Some(host.version());
        self.highlights.set_current(host, self.cursor.current());
    }

    fn reveal_current(&mut self, host: &mut dyn EditorHost) {
        let Some(index) = self.cursor.current() else {
            return;
        };
        let Some(m) = self.matches.get(index) else {
            return;
        };
        let range = self.highlights.locate(index, m);
        if let Err(e) = host.reveal(range) {
            warn!("Failed to reveal match {}: {}", index, e);
            self.notify(e.into());
        }
    }

    fn notify(&mut self, notice: Notice) {
        match &notice {
            Notice::Replaced(_) => info!("{}", notice),
            n if n.is_error() => warn!("{}", notice),
            _ => debug!("{}", notice),
        }
        self.notices.push(notice);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DecorationStyle, Document};

    fn session(term: &str) -> SearchSession {
        let mut session = SearchSession::default();
        session.set_search_term(term);
        session
    }

    fn markers_session(term: &str) -> SearchSession {
        let mut session = SearchSession::new(SessionConfig {
            highlight_strategy: HighlightStrategy::Markers,
            ..SessionConfig::default()
        });
        session.set_search_term(term);
        session
    }

    #[test]
    fn test_find_all_selects_first() {
        let mut doc = Document::new("cat bat cat");
        let mut session = session("cat");
        session.find_all(&mut doc);

        assert_eq!(session.matches().positions(), vec![0, 8]);
        assert_eq!(session.current(), Some(0));
        assert_eq!(session.counter(), "1/2");
        assert_eq!(doc.selection(), Some(0..3));
        assert_eq!(doc.decoration_count(), 2);
        assert!(session.notices().is_empty());
    }

    #[test]
    fn test_empty_term_notice() {
        let mut doc = Document::new("text");
        let mut session = session("   ");
        session.find_all(&mut doc);
        assert_eq!(session.last_notice(), Some(&Notice::EmptySearchTerm));
        assert!(session.matches().is_empty());
    }

    #[test]
    fn test_invalid_regex_notice() {
        let mut doc = Document::new("text");
        let mut session = session("(unclosed");
        session.set_use_regex(true);
        session.find_all(&mut doc);

        assert!(matches!(session.last_notice(), Some(Notice::InvalidPattern(_))));
        assert_eq!(session.counter(), "No matches");
        assert_eq!(doc.decoration_count(), 0);
    }

    #[test]
    fn test_no_matches_notice() {
        let mut doc = Document::new("text");
        let mut session = session("zzz");
        session.find_all(&mut doc);
        assert_eq!(session.last_notice(), Some(&Notice::NoMatches));
        assert_eq!(session.current(), None);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut doc = Document::new("x x x");
        let mut session = session("x");
        session.find_all(&mut doc);

        session.next(&mut doc);
        session.next(&mut doc);
        assert_eq!(session.current(), Some(2));
        session.next(&mut doc);
        assert_eq!(session.current(), Some(0));
        session.previous(&mut doc);
        assert_eq!(session.current(), Some(2));
        assert_eq!(doc.selection(), Some(4..5));
    }

    #[test]
    fn test_next_rebuilds_from_empty() {
        let mut doc = Document::new("a cat");
        let mut session = session("cat");
        session.next(&mut doc);
        assert_eq!(session.current(), Some(0));
        assert_eq!(doc.selection(), Some(2..5));
    }

    #[test]
    fn test_previous_rebuilds_from_empty_to_last() {
        let mut doc = Document::new("cat cat cat");
        let mut session = session("cat");
        session.previous(&mut doc);
        assert_eq!(session.current(), Some(2));
    }

    #[test]
    fn test_next_with_nothing_found() {
        let mut doc = Document::new("dog");
        let mut session = session("cat");
        session.next(&mut doc);
        assert_eq!(session.current(), None);
        assert_eq!(session.last_notice(), Some(&Notice::NoMatches));
    }

    #[test]
    fn test_current_decoration_follows_cursor() {
        let mut doc = Document::new("x x");
        let mut session = session("x");
        session.find_all(&mut doc);
        session.next(&mut doc);

        let styles: Vec<_> = doc.decorations().map(|d| d.style).collect();
        assert_eq!(styles, vec![DecorationStyle::Match, DecorationStyle::Current]);
    }

    #[test]
    fn test_term_change_invalidates() {
        let mut doc = Document::new("cat dog");
        let mut session = session("cat");
        session.find_all(&mut doc);
        session.set_search_term("dog");
        session.next(&mut doc);
        assert_eq!(session.current_match().map(|m| m.position), Some(4));
    }

    #[test]
    fn test_replace_next_moves_forward() {
        let mut doc = Document::new("cat bat cat");
        let mut session = session("cat");
        session.set_replacement("dog");
        session.find_all(&mut doc);

        session.replace_next(&mut doc);
        assert_eq!(doc.text(), "dog bat cat");
        assert_eq!(session.current_match().map(|m| m.position), Some(8));
        assert_eq!(session.last_notice(), Some(&Notice::Replaced(1)));
        assert_eq!(doc.stats().range_replacements, 1);
        assert_eq!(doc.stats().full_rewrites, 0);

        session.replace_next(&mut doc);
        assert_eq!(doc.text(), "dog bat dog");
        assert_eq!(session.counter(), "No matches");
    }

    #[test]
    fn test_replace_next_wraps_to_first() {
        let mut doc = Document::new("cat bat cat");
        let mut session = session("cat");
        session.set_replacement("dog");
        session.find_all(&mut doc);
        session.next(&mut doc);

        session.replace_next(&mut doc);
        assert_eq!(doc.text(), "cat bat dog");
        assert_eq!(session.current(), Some(0));
    }

    #[test]
    fn test_replace_next_self_matching_advances() {
        let mut doc = Document::new("a a");
        let mut session = session("a");
        session.set_replacement("aa");
        session.find_all(&mut doc);

        session.replace_next(&mut doc);
        assert_eq!(doc.text(), "aa a");
        // The inserted "aa" is skipped; the next match is the original second "a"
        assert_eq!(session.current_match().map(|m| m.position), Some(3));
    }

    #[test]
    fn test_replace_next_zero_width_advances() {
        let mut doc = Document::new("ab");
        let mut session = session("x*");
        session.set_use_regex(true);
        session.find_all(&mut doc);
        assert_eq!(session.matches().positions(), vec![0, 1, 2]);

        let mut visited = Vec::new();
        for _ in 0..3 {
            session.replace_next(&mut doc);
            visited.push(session.current_match().map(|m| m.position));
        }
        assert_eq!(visited, vec![Some(1), Some(2), Some(0)]);
        assert_eq!(doc.text(), "ab");
        assert_eq!(session.last_notice(), Some(&Notice::Replaced(1)));
    }

    #[test]
    fn test_replace_all() {
        let mut doc = Document::new("cat bat cat");
        let mut session = session("cat");
        session.set_replacement("dog");
        session.replace_all(&mut doc);

        assert_eq!(doc.text(), "dog bat dog");
        assert_eq!(session.last_notice(), Some(&Notice::Replaced(2)));
        assert!(session.matches().is_empty());
    }

    #[test]
    fn test_replace_all_counts_one_scan() {
        let mut doc = Document::new("aabb");
        let mut session = session("ab");
        session.find_all(&mut doc);
        assert_eq!(session.matches().len(), 1);

        session.replace_all(&mut doc);
        assert_eq!(doc.text(), "ab");
        assert_eq!(session.last_notice(), Some(&Notice::Replaced(1)));
        // The match exposed by the splice is highlighted, not replaced
        assert_eq!(session.matches().positions(), vec![0]);
        assert_eq!(doc.decoration_count(), 1);
    }

    #[test]
    fn test_replace_all_nothing_found() {
        let mut doc = Document::new("dog");
        let mut session = session("cat");
        session.set_replacement("x");
        session.replace_all(&mut doc);
        assert_eq!(doc.text(), "dog");
        assert_eq!(session.last_notice(), Some(&Notice::NoMatches));
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_replace_all_self_matching_keeps_highlights_consistent() {
        let mut doc = Document::new("cat cat");
        let mut session = session("cat");
        session.set_replacement("cats");
        session.replace_all(&mut doc);

        assert_eq!(doc.text(), "cats cats");
        assert_eq!(session.matches().positions(), vec![0, 5]);
        assert_eq!(doc.decoration_count(), 2);
    }

    #[test]
    fn test_restrict_to_selection() {
        let mut doc = Document::new("xx cat xx cat xx");
        doc.select(1..8);
        let mut session = session("cat");
        session.set_restrict_to_selection(&mut doc, true);
        session.find_all(&mut doc);

        assert_eq!(session.matches().positions(), vec![3]);
        // Selecting the match must not shrink the scope
        assert_eq!(doc.selection(), Some(3..6));
        session.find_all(&mut doc);
        assert_eq!(session.matches().positions(), vec![3]);
    }

    #[test]
    fn test_restrict_without_selection_searches_everything() {
        let mut doc = Document::new("cat cat");
        let mut session = session("cat");
        session.set_restrict_to_selection(&mut doc, true);
        session.find_all(&mut doc);
        assert_eq!(session.matches().len(), 2);
    }

    #[test]
    fn test_replace_all_in_scope_only() {
        let mut doc = Document::new("cat [cat cat] cat");
        doc.select(4..13);
        let mut session = session("cat");
        session.set_replacement("dog");
        session.set_restrict_to_selection(&mut doc, true);
        session.replace_all(&mut doc);

        assert_eq!(doc.text(), "cat [dog dog] cat");
        assert_eq!(session.last_notice(), Some(&Notice::Replaced(2)));
    }

    #[test]
    fn test_scope_shifts_after_replace_next() {
        let mut doc = Document::new("ab [a a] a");
        doc.select(3..8);
        let mut session = session("a");
        session.set_replacement("xyz");
        session.set_restrict_to_selection(&mut doc, true);
        session.find_all(&mut doc);
        assert_eq!(session.matches().positions(), vec![4, 6]);

        session.replace_next(&mut doc);
        assert_eq!(doc.text(), "ab [xyz a] a");
        assert_eq!(session.scope(), Some(SearchScope::new(3, 10)));
        assert_eq!(session.matches().positions(), vec![8]);
    }

    #[test]
    fn test_close_clears_everything() {
        let mut doc = Document::new("cat cat");
        let mut session = session("cat");
        session.open(&mut doc, PanelMode::Find);
        session.find_all(&mut doc);
        session.close(&mut doc);

        assert!(!session.is_open());
        assert_eq!(doc.decoration_count(), 0);
        assert!(session.matches().is_empty());
        assert_eq!(session.current(), None);
    }

    #[test]
    fn test_open_switches_mode() {
        let mut doc = Document::new("");
        let mut session = SearchSession::default();
        session.open(&mut doc, PanelMode::Find);
        session.open(&mut doc, PanelMode::Replace);
        assert!(session.is_open());
        assert_eq!(session.mode(), PanelMode::Replace);
    }

    #[test]
    fn test_markers_find_and_close() {
        let mut doc = Document::new("cat bat cat");
        let mut session = markers_session("cat");
        session.find_all(&mut doc);

        assert_eq!(doc.text(), "==cat== bat ==cat==");
        // The selection covers the word inside the markers
        assert_eq!(doc.selection(), Some(2..5));

        session.next(&mut doc);
        assert_eq!(doc.selection(), Some(14..17));
        assert_eq!(doc.text(), "==cat== bat ==cat==");

        session.close(&mut doc);
        assert_eq!(doc.text(), "cat bat cat");
    }

    #[test]
    fn test_markers_do_not_leak_into_replace() {
        let mut doc = Document::new("cat bat cat");
        let mut session = markers_session("cat");
        session.set_replacement("dog");
        session.find_all(&mut doc);

        session.replace_next(&mut doc);
        assert_eq!(doc.text(), "dog bat ==cat==");
        session.replace_all(&mut doc);
        assert_eq!(doc.text(), "dog bat dog");
        session.close(&mut doc);
        assert_eq!(doc.text(), "dog bat dog");
    }

    #[test]
    fn test_markers_repeated_find_does_not_double_wrap() {
        let mut doc = Document::new("cat");
        let mut session = markers_session("cat");
        session.find_all(&mut doc);
        session.find_all(&mut doc);
        assert_eq!(doc.text(), "==cat==");
    }

    #[test]
    fn test_clear_highlights_keeps_panel_open() {
        let mut doc = Document::new("cat bat cat");
        let mut session = markers_session("cat");
        session.open(&mut doc, PanelMode::Find);
        session.find_all(&mut doc);

        session.clear_highlights(&mut doc);
        assert_eq!(doc.text(), "cat bat cat");
        assert!(session.is_open());
        assert!(!session.has_highlights());

        session.next(&mut doc);
        assert_eq!(session.current(), Some(0));
    }

    #[test]
    fn test_refresh_follows_edit_with_decorations() {
        let mut doc = Document::new("cat bat cat");
        let mut session = session("cat");
        session.open(&mut doc, PanelMode::Find);
        session.find_all(&mut doc);
        session.next(&mut doc);
        assert_eq!(session.current(), Some(1));

        doc.set_text("cat cat bat cat".to_string());
        session.refresh(&mut doc);

        assert_eq!(session.matches().positions(), vec![0, 4, 12]);
        // Re-anchored at the old position 8, the next match is at 12
        assert_eq!(session.current(), Some(2));
        assert_eq!(doc.decoration_count(), 3);
        assert!(session.notices().is_empty());
    }

    #[test]
    fn test_refresh_removes_markers() {
        let mut doc = Document::new("cat bat");
        let mut session = markers_session("cat");
        session.open(&mut doc, PanelMode::Find);
        session.find_all(&mut doc);
        assert_eq!(doc.text(), "==cat== bat");

        doc.set_text("==cat== bat!".to_string());
        session.refresh(&mut doc);
        assert_eq!(doc.text(), "cat bat!");
        assert!(!session.has_highlights());
    }

    #[test]
    fn test_refresh_when_closed_does_nothing() {
        let mut doc = Document::new("cat");
        let mut session = session("cat");
        session.refresh(&mut doc);
        assert_eq!(doc.decoration_count(), 0);
        assert!(session.matches().is_empty());
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(Notice::EmptySearchTerm.to_string(), "Please enter a search term");
        assert_eq!(Notice::NoMatches.to_string(), "No matches found");
        assert_eq!(Notice::Replaced(1).to_string(), "Replaced 1 occurrence");
        assert_eq!(Notice::Replaced(3).to_string(), "Replaced 3 occurrences");
        assert!(Notice::InvalidPattern("x".into()).is_error());
        assert!(!Notice::NoMatches.is_error());
    }

    #[test]
    fn test_notice_from_error() {
        assert_eq!(Notice::from(Error::EmptySearchTerm), Notice::EmptySearchTerm);
        assert_eq!(
            Notice::from(Error::Position {
                message: "bad".into()
            }),
            Notice::Position("bad".into())
        );
        assert!(matches!(
            Notice::from(Error::StaleMatch { position: 3 }),
            Notice::Failed(_)
        ));
    }
}
