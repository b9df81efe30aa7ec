//! Host editor abstraction
//!
//! The search session never owns the document. It talks to whatever editor
//! hosts it through [`EditorHost`]: whole-text access, offset/position
//! conversion, ranged replacement, selection and scrolling, plus optional
//! native decorations for highlighting.

mod document;

pub use document::{Decoration, Document, EditStats};

use crate::error::Result;
use std::ops::Range;

/// A line/column coordinate in the document.
///
/// Both fields are 0-indexed; `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Character column within the line (0-indexed)
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Handle to a decoration created by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationId(pub u64);

/// How a decoration should be painted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecorationStyle {
    /// An ordinary search match
    #[default]
    Match,
    /// The currently selected search match
    Current,
}

/// The editor capabilities the search engine needs.
pub trait EditorHost {
    /// The whole document text.
    fn text(&self) -> &str;

    /// Replace the whole document text.
    fn set_text(&mut self, text: String);

    /// Convert a byte offset to a line/column position.
    fn offset_to_position(&self, offset: usize) -> Result<Position>;

    /// Convert a line/column position to a byte offset.
    fn position_to_offset(&self, position: Position) -> Result<usize>;

    /// Replace the text between two positions without rewriting the rest.
    fn replace_range(&mut self, text: &str, from: Position, to: Position) -> Result<()>;

    /// Select the text between two positions.
    fn set_selection(&mut self, from: Position, to: Position);

    /// Ask the view to bring a range into view.
    fn scroll_into_view(&mut self, from: Position, to: Position);

    /// The current non-empty selection, if any.
    fn selected_range(&self) -> Option<(Position, Position)>;

    /// A counter that changes whenever the document text changes.
    fn version(&self) -> u64;

    /// Add a decoration over a byte range.
    ///
    /// Returns `None` when the host has no native decoration support.
    fn add_decoration(&mut self, _range: Range<usize>, _style: DecorationStyle) -> Option<DecorationId> {
        None
    }

    /// Change the style of an existing decoration.
    fn set_decoration_style(&mut self, _id: DecorationId, _style: DecorationStyle) -> bool {
        false
    }

    /// Remove a decoration. Returns `false` if it was not present.
    fn remove_decoration(&mut self, _id: DecorationId) -> bool {
        false
    }

    /// Select and reveal a byte range.
    fn reveal(&mut self, range: Range<usize>) -> Result<()> {
        let from = self.offset_to_position(range.start)?;
        let to = self.offset_to_position(range.end)?;
        self.set_selection(from, to);
        self.scroll_into_view(from, to);
        Ok(())
    }

    /// The current selection as a byte range, if any.
    fn selected_offsets(&self) -> Result<Option<Range<usize>>> {
        match self.selected_range() {
            Some((from, to)) => {
                let a = self.position_to_offset(from)?;
                let b = self.position_to_offset(to)?;
                Ok(Some(a.min(b)..a.max(b)))
            }
            None => Ok(None),
        }
    }
}
