//! UI components for findmark
//!
//! This module contains the find/replace panel.

mod find_panel;

pub use find_panel::{FindReplacePanel, FindReplacePanelOutput, FindState};
