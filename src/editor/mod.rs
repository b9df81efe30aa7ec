//! Editor module for findmark
//!
//! This module contains the text editor widget that displays the document
//! and paints search highlights over it.

mod widget;

pub use widget::{match_highlight_colors, EditorOutput, EditorWidget};
