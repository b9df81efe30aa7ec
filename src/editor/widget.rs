//! Text editor widget for findmark
//!
//! This module implements the document view using egui's TextEdit. It paints
//! the document's search decorations over the text, applies selection and
//! scroll requests made through the host interface, and feeds the user's
//! own selection back into the document.

use crate::host::{Decoration, DecorationStyle, Document, EditorHost};
use crate::string_utils::{byte_range_to_char_range, char_index_to_byte_index};
use eframe::egui::text::{CCursor, CCursorRange};
use eframe::egui::{self, Color32, FontId, Galley, Pos2, Rect, ScrollArea, TextEdit, Ui};
use log::debug;
use std::ops::Range;
use std::sync::Arc;

/// Result of showing the editor widget.
pub struct EditorOutput {
    /// Whether the user modified the content.
    pub changed: bool,
}

/// A text editor widget over a [`Document`].
///
/// # Example
///
/// ```ignore
/// EditorWidget::new(&mut state.document)
///     .font_size(settings.font_size)
///     .word_wrap(settings.word_wrap)
///     .show(ui);
/// ```
pub struct EditorWidget<'a> {
    /// The document being edited.
    document: &'a mut Document,
    /// Font size for the editor.
    font_size: f32,
    /// Whether word wrap is enabled.
    word_wrap: bool,
    /// Whether the dark palette is used for match highlights.
    is_dark: bool,
    /// ID for the editor (for state persistence).
    id: Option<egui::Id>,
}

impl<'a> EditorWidget<'a> {
    /// Create a new editor widget for the given document.
    pub fn new(document: &'a mut Document) -> Self {
        Self {
            document,
            font_size: 14.0,
            word_wrap: true,
            is_dark: false,
            id: None,
        }
    }

    /// Set the font size for the editor.
    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set whether word wrap is enabled.
    #[must_use]
    pub fn word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = wrap;
        self
    }

    /// Use the dark highlight palette.
    #[must_use]
    pub fn dark(mut self, is_dark: bool) -> Self {
        self.is_dark = is_dark;
        self
    }

    /// Set a custom ID for the editor.
    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Show the editor widget and return the output.
    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("editor"));
        let font_size = self.font_size;
        let word_wrap = self.word_wrap;
        let (current_color, match_color) = match_highlight_colors(self.is_dark);

        // A selection set through the host replaces the widget's cursor
        let requested_selection = self.document.take_selection_request();
        if let Some(range) = &requested_selection {
            let (start, end) = byte_range_to_char_range(self.document.text(), range.start, range.end);
            let mut state = TextEdit::load_state(ui.ctx(), id).unwrap_or_default();
            state.cursor.set_char_range(Some(CCursorRange::two(
                CCursor::new(start),
                CCursor::new(end),
            )));
            state.store(ui.ctx(), id);
        }
        let scroll_request = self.document.take_scroll_request();
        let decorations: Vec<Decoration> = self.document.decorations().cloned().collect();

        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| -> Arc<Galley> {
            let font_id = FontId::monospace(font_size);
            let layout_job = if word_wrap {
                egui::text::LayoutJob::simple(
                    text.to_owned(),
                    font_id,
                    ui.visuals().text_color(),
                    wrap_width,
                )
            } else {
                egui::text::LayoutJob::simple_singleline(
                    text.to_owned(),
                    font_id,
                    ui.visuals().text_color(),
                )
            };
            ui.fonts(|f| f.layout_job(layout_job))
        };

        let mut cursor_range = None;
        let changed = self.document.edit_with(|content| {
            ScrollArea::vertical()
                .id_source(id.with("scroll"))
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let text_output = TextEdit::multiline(content)
                        .id(id)
                        .frame(false)
                        .font(FontId::monospace(font_size))
                        .desired_width(f32::INFINITY)
                        .layouter(&mut layouter)
                        .show(ui);

                    let galley = &text_output.galley;
                    let galley_pos = text_output.galley_pos;

                    for decoration in &decorations {
                        let Some(chars) = char_range(content, &decoration.range) else {
                            continue;
                        };
                        let color = match decoration.style {
                            DecorationStyle::Current => current_color,
                            DecorationStyle::Match => match_color,
                        };
                        for rect in range_rects(galley, galley_pos, chars) {
                            ui.painter().rect_filled(rect, 2.0, color);
                        }
                    }

                    if let Some(chars) = scroll_request.as_ref().and_then(|r| char_range(content, r)) {
                        if let Some(target) = range_rects(galley, galley_pos, chars)
                            .into_iter()
                            .reduce(|a, b| a.union(b))
                        {
                            debug!("Scrolling editor to {:?}", target);
                            ui.scroll_to_rect(target, Some(egui::Align::Center));
                        }
                    }

                    cursor_range = text_output.cursor_range;
                });
        });

        // The user's own selection becomes the document selection
        if requested_selection.is_none() {
            if let Some(range) = cursor_range {
                let text = self.document.text();
                let a = char_index_to_byte_index(text, range.primary.ccursor.index);
                let b = char_index_to_byte_index(text, range.secondary.ccursor.index);
                self.document.select(a.min(b)..a.max(b));
            }
        }

        EditorOutput { changed }
    }
}

/// Convert a byte range of `text` to a char range, if it is still valid.
fn char_range(text: &str, range: &Range<usize>) -> Option<Range<usize>> {
    if range.start > range.end || range.end > text.len() {
        return None;
    }
    if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
        return None;
    }
    let (start, end) = byte_range_to_char_range(text, range.start, range.end);
    Some(start..end)
}

/// Screen rectangles covering a char range of a laid-out galley, one per row.
fn range_rects(galley: &Galley, galley_pos: Pos2, chars: Range<usize>) -> Vec<Rect> {
    let start = galley.from_ccursor(CCursor::new(chars.start)).rcursor;
    let end = galley.from_ccursor(CCursor::new(chars.end)).rcursor;

    (start.row..=end.row)
        .filter_map(|row_idx| {
            let row = galley.rows.get(row_idx)?;
            let x_start = if row_idx == start.row {
                row.x_offset(start.column)
            } else {
                0.0
            };
            let x_end = if row_idx == end.row {
                row.x_offset(end.column)
            } else {
                row.rect.width()
            };
            Some(Rect::from_min_max(
                egui::pos2(galley_pos.x + x_start, galley_pos.y + row.rect.min.y),
                egui::pos2(galley_pos.x + x_end.max(x_start + 2.0), galley_pos.y + row.rect.max.y),
            ))
        })
        .collect()
}

/// Get highlight colors for search matches.
///
/// Returns (current_match_bg, other_matches_bg).
pub fn match_highlight_colors(is_dark: bool) -> (Color32, Color32) {
    if is_dark {
        (
            Color32::from_rgba_unmultiplied(255, 200, 0, 150),
            Color32::from_rgba_unmultiplied(180, 150, 50, 80),
        )
    } else {
        (
            Color32::from_rgba_unmultiplied(255, 220, 0, 180),
            Color32::from_rgba_unmultiplied(255, 255, 100, 120),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
