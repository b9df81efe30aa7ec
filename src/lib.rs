//! findmark
//!
//! A find/replace engine for plain text documents: literal and regex
//! matching, selection-scoped search, wraparound navigation, bounded
//! replace-all and match highlighting through editor decorations or
//! in-text markers. The `app` module hosts it in an egui editor window.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod files;
pub mod highlight;
pub mod host;
pub mod search;
pub mod session;
pub mod state;
pub mod string_utils;
pub mod ui;
