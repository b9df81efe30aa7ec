//! In-memory document implementing [`EditorHost`]
//!
//! This is the buffer behind the editor widget, and the host used by the
//! session tests. It keeps a line-start index for position conversion,
//! a decoration table, the selection, a pending scroll request and
//! counters that tell whole-text rewrites apart from ranged replacements.

use super::{DecorationId, DecorationStyle, EditorHost, Position};
use crate::error::{Error, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::ops::Range;

/// A decoration painted over a byte range of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Byte range covered
    pub range: Range<usize>,
    /// Paint style
    pub style: DecorationStyle,
}

/// Counts of text mutations, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditStats {
    /// Calls to `set_text`
    pub full_rewrites: usize,
    /// Calls to `replace_range`
    pub range_replacements: usize,
}

/// A text document with selection, scrolling and decorations.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    line_starts: Vec<usize>,
    selection: Option<Range<usize>>,
    selection_requested: bool,
    scroll_request: Option<Range<usize>>,
    decorations: BTreeMap<DecorationId, Decoration>,
    next_decoration: u64,
    supports_decorations: bool,
    version: u64,
    stats: EditStats,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// Create a document with native decoration support.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = line_starts(&text);
        Self {
            text,
            line_starts,
            selection: None,
            selection_requested: false,
            scroll_request: None,
            decorations: BTreeMap::new(),
            next_decoration: 0,
            supports_decorations: true,
            version: 0,
            stats: EditStats::default(),
        }
    }

    /// Create a document whose host has no decoration support.
    pub fn without_decorations(text: impl Into<String>) -> Self {
        Self {
            supports_decorations: false,
            ..Self::new(text)
        }
    }

    /// Number of lines (an empty document has one).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Mutation counters.
    pub fn stats(&self) -> EditStats {
        self.stats
    }

    /// Live decorations in creation order.
    pub fn decorations(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.values()
    }

    /// Number of live decorations.
    pub fn decoration_count(&self) -> usize {
        self.decorations.len()
    }

    /// The selection as a byte range.
    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    /// Select a byte range directly (as the user would with the mouse).
    ///
    /// An empty range clears the selection.
    pub fn select(&mut self, range: Range<usize>) {
        self.selection = if range.is_empty() { None } else { Some(range) };
    }

    /// Take a selection set through [`EditorHost::set_selection`] that the
    /// view has not applied yet.
    pub fn take_selection_request(&mut self) -> Option<Range<usize>> {
        if std::mem::take(&mut self.selection_requested) {
            self.selection.clone()
        } else {
            None
        }
    }

    /// Take the pending scroll request.
    pub fn take_scroll_request(&mut self) -> Option<Range<usize>> {
        self.scroll_request.take()
    }

    /// Let a text widget edit the buffer in place.
    ///
    /// Returns whether the text changed; the line index and version are
    /// refreshed when it did.
    pub fn edit_with(&mut self, edit: impl FnOnce(&mut String)) -> bool {
        let original = self.text.clone();
        edit(&mut self.text);
        let changed = self.text != original;
        if changed {
            self.after_edit();
        }
        changed
    }

    fn after_edit(&mut self) {
        self.line_starts = line_starts(&self.text);
        self.version += 1;
        if let Some(sel) = &self.selection {
            if sel.end > self.text.len() {
                self.selection = None;
            }
        }
    }

    fn line_end(&self, line: usize) -> usize {
        match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        }
    }
}

/// Byte offsets at which each line starts.
fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

impl EditorHost for Document {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.stats.full_rewrites += 1;
        self.after_edit();
    }

    fn offset_to_position(&self, offset: usize) -> Result<Position> {
        if offset > self.text.len() {
            return Err(Error::offset_out_of_range(offset, self.text.len()));
        }
        if !self.text.is_char_boundary(offset) {
            return Err(Error::Position {
                message: format!("offset {} is inside a multi-byte character", offset),
            });
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = self.text[self.line_starts[line]..offset].chars().count();
        Ok(Position::new(line, column))
    }

    fn position_to_offset(&self, position: Position) -> Result<usize> {
        let start = *self.line_starts.get(position.line).ok_or_else(|| Error::Position {
            message: format!(
                "line {} is past the end of the document ({} lines)",
                position.line,
                self.line_count()
            ),
        })?;
        let line = &self.text[start..self.line_end(position.line)];
        let within = if position.column == line.chars().count() {
            line.len()
        } else {
            line.char_indices()
                .nth(position.column)
                .map(|(i, _)| i)
                .ok_or_else(|| Error::Position {
                    message: format!(
                        "column {} is past the end of line {}",
                        position.column, position.line
                    ),
                })?
        };
        Ok(start + within)
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) -> Result<()> {
        let start = self.position_to_offset(from)?;
        let end = self.position_to_offset(to)?;
        if start > end {
            return Err(Error::Position {
                message: format!("range start {} is after its end {}", start, end),
            });
        }
        self.text.replace_range(start..end, text);
        self.stats.range_replacements += 1;
        self.after_edit();
        Ok(())
    }

    fn set_selection(&mut self, from: Position, to: Position) {
        match (self.position_to_offset(from), self.position_to_offset(to)) {
            (Ok(a), Ok(b)) => {
                self.selection = Some(a.min(b)..a.max(b));
                self.selection_requested = true;
            }
            (Err(e), _) | (_, Err(e)) => warn!("Ignoring selection request: {}", e),
        }
    }

    fn scroll_into_view(&mut self, from: Position, to: Position) {
        if let (Ok(a), Ok(b)) = (self.position_to_offset(from), self.position_to_offset(to)) {
            self.scroll_request = Some(a.min(b)..a.max(b));
        }
    }

    fn selected_range(&self) -> Option<(Position, Position)> {
        let selection = self.selection.as_ref().filter(|s| !s.is_empty())?;
        let from = self.offset_to_position(selection.start).ok()?;
        let to = self.offset_to_position(selection.end).ok()?;
        Some((from, to))
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn add_decoration(&mut self, range: Range<usize>, style: DecorationStyle) -> Option<DecorationId> {
        if !self.supports_decorations {
            return None;
        }
        let id = DecorationId(self.next_decoration);
        self.next_decoration += 1;
        self.decorations.insert(id, Decoration { range, style });
        Some(id)
    }

    fn set_decoration_style(&mut self, id: DecorationId, style: DecorationStyle) -> bool {
        match self.decorations.get_mut(&id) {
            Some(decoration) => {
                decoration.style = style;
                true
            }
            None => false,
        }
    }

    fn remove_decoration(&mut self, id: DecorationId) -> bool {
        let removed = self.decorations.remove(&id).is_some();
        if !removed {
            debug!("Decoration {:?} already removed", id);
        }
        removed
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
