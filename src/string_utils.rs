//! UTF-8 boundary utilities
//!
//! Match offsets in this crate are byte offsets into UTF-8 text, while egui
//! cursors and line/column positions count characters. These helpers keep
//! every conversion on a character boundary so slicing never panics.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest character boundary that is `<= index`.
///
/// Indices past the end clamp to `s.len()`.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Returns the smallest character boundary that is `>= index`.
///
/// Indices past the end clamp to `s.len()`.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Returns the boundary of the character following the one at `index`.
///
/// Used to force a scan forward by exactly one character after a
/// zero-width match. At or past the end of the string this returns
/// `s.len() + 1` so callers can detect exhaustion.
#[inline]
pub fn next_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len() + 1;
    }
    s[index..]
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
        .unwrap_or(s.len() + 1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion Utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character index to a byte index.
///
/// Returns the string length if `char_index` is beyond the string.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte index to a character index.
///
/// A byte index inside a multi-byte character counts up to that character.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

/// Convert a byte range to a character range.
pub fn byte_range_to_char_range(s: &str, start: usize, end: usize) -> (usize, usize) {
    let start = floor_char_boundary(s, start);
    let end = ceil_char_boundary(s, end.max(start));
    let char_start = s[..start].chars().count();
    (char_start, char_start + s[start..end].chars().count())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
