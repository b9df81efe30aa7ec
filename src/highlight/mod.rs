//! Match highlighting
//!
//! The [`HighlightManager`] paints one round of matches at a time and only
//! ever revokes what it painted itself. Hosts with native decorations get one
//! decoration per match; hosts without them fall back to textual markers
//! (see [`markers`]), which rewrite the document and are undone exactly.

pub mod markers;

use crate::host::{DecorationId, DecorationStyle, EditorHost};
use crate::search::{Match, MatchSet};
use log::{debug, warn};
use markers::{MarkerSpan, MarkerStyle};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How matches are made visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStrategy {
    /// Host decorations keyed by byte range; the text is never touched
    #[default]
    Decorations,
    /// Delimiters written around each match in the document text
    Markers,
}

/// A revocable handle for one highlighted match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightRecord {
    /// A host decoration
    Decoration(DecorationId),
    /// A marker pair written into the text
    Marker(MarkerSpan),
}

/// Applies and clears highlights, one round at a time.
#[derive(Debug, Clone)]
pub struct HighlightManager {
    strategy: HighlightStrategy,
    marker_style: MarkerStyle,
    records: Vec<HighlightRecord>,
    current: Option<usize>,
}

impl HighlightManager {
    /// Create a manager with the preferred strategy.
    pub fn new(strategy: HighlightStrategy, marker_style: MarkerStyle) -> Self {
        Self {
            strategy,
            marker_style,
            records: Vec::new(),
            current: None,
        }
    }

    /// The preferred strategy.
    pub fn strategy(&self) -> HighlightStrategy {
        self.strategy
    }

    /// Whether a round is currently painted.
    pub fn is_active(&self) -> bool {
        !self.records.is_empty()
    }

    /// Whether the current round wrote markers into the text.
    pub fn has_markers(&self) -> bool {
        matches!(self.records.first(), Some(HighlightRecord::Marker(_)))
    }

    /// Highlight every match in `matches`.
    ///
    /// Any previous round is cleared first. `matches` must have been computed
    /// from the host's current text; a stale set is not painted.
    pub fn apply(&mut self, host: &mut dyn EditorHost, matches: &MatchSet) -> usize {
        self.clear(host);

        if matches.is_empty() {
            return 0;
        }
        if !matches.is_current_for(host.text()) {
            warn!("Not highlighting {} stale matches", matches.len());
            return 0;
        }

        if self.strategy == HighlightStrategy::Decorations && self.apply_decorations(host, matches) {
            debug!("Highlighted {} matches with decorations", self.records.len());
            return self.records.len();
        }

        self.apply_markers(host, matches);
        debug!("Highlighted {} matches with text markers", self.records.len());
        self.records.len()
    }

    fn apply_decorations(&mut self, host: &mut dyn EditorHost, matches: &MatchSet) -> bool {
        for m in matches {
            match host.add_decoration(m.range(), DecorationStyle::Match) {
                Some(id) => self.records.push(HighlightRecord::Decoration(id)),
                None => {
                    debug!("Host has no decoration support, falling back to text markers");
                    self.clear(host);
                    return false;
                }
            }
        }
        true
    }

    fn apply_markers(&mut self, host: &mut dyn EditorHost, matches: &MatchSet) {
        let (marked, spans) = markers::wrap(host.text(), matches.as_slice(), &self.marker_style);
        host.set_text(marked);
        self.records = spans.into_iter().map(HighlightRecord::Marker).collect();
    }

    /// Remove this round's highlights. A no-op when nothing is painted.
    ///
    /// Highlights that have disappeared (for example after an external edit)
    /// are skipped.
    pub fn clear(&mut self, host: &mut dyn EditorHost) {
        let records = std::mem::take(&mut self.records);
        self.current = None;
        if records.is_empty() {
            return;
        }

        let spans: Vec<MarkerSpan> = records
            .iter()
            .filter_map(|record| match record {
                HighlightRecord::Marker(span) => Some(*span),
                HighlightRecord::Decoration(_) => None,
            })
            .collect();

        let mut missing = 0;
        for record in &records {
            if let HighlightRecord::Decoration(id) = record {
                if !host.remove_decoration(*id) {
                    missing += 1;
                }
            }
        }

        if !spans.is_empty() {
            let (restored, skipped) = markers::unwrap(host.text(), &spans, &self.marker_style);
            missing += skipped;
            if restored != host.text() {
                host.set_text(restored);
            }
        }

        if missing > 0 {
            warn!("{} highlights were already gone when clearing", missing);
        }
        debug!("Cleared {} highlights", records.len() - missing);
    }

    /// Mark match `index` as the current one.
    pub fn set_current(&mut self, host: &mut dyn EditorHost, index: Option<usize>) {
        if self.current == index {
            return;
        }
        if let Some(HighlightRecord::Decoration(id)) = self.current.and_then(|i| self.records.get(i)) {
            host.set_decoration_style(*id, DecorationStyle::Match);
        }
        if let Some(HighlightRecord::Decoration(id)) = index.and_then(|i| self.records.get(i)) {
            host.set_decoration_style(*id, DecorationStyle::Current);
        }
        self.current = index;
    }

    /// Where match `index` currently sits in the host document.
    ///
    /// Identity unless text markers are painted, in which case the range is
    /// shifted past every marker written before it.
    pub fn locate(&self, index: usize, m: &Match) -> Range<usize> {
        match self.records.get(index) {
            Some(HighlightRecord::Marker(span)) => {
                let start = span.open_at + self.marker_style.open.len();
                start..start + m.length
            }
            _ => m.range(),
        }
    }

    /// Map an offset in the marked document back to clean-text coordinates.
    pub fn unmark_offset(&self, offset: usize) -> usize {
        let open = self.marker_style.open.len();
        let close = self.marker_style.close.len();
        let mut removed = 0;
        for record in &self.records {
            if let HighlightRecord::Marker(span) = record {
                if span.open_at + open <= offset {
                    removed += open;
                }
                if span.close_at + close <= offset {
                    removed += close;
                }
            }
        }
        offset - removed
    }
}

impl Default for HighlightManager {
    fn default() -> Self {
        Self::new(HighlightStrategy::default(), MarkerStyle::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
