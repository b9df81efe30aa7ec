//! Search engine for findmark
//!
//! This module contains the pure, host-independent parts of find and replace:
//! pattern compilation, match scanning, scope restriction, the current-match
//! cursor and the replacement engine. Nothing here touches an editor; every
//! function reads text and returns new values.

mod cursor;
mod matcher;
mod pattern;
mod replace;
mod scope;

pub use cursor::MatchCursor;
pub use matcher::{find_all, scan, scan_matches, Match, MatchSet, TextSnapshot};
pub use pattern::{compile, CompiledPattern, Pattern, SearchOptions};
pub use replace::{ReplaceAllOutcome, ReplaceEngine, Replaced};
pub use scope::{scan_scoped, ScopedText, SearchScope};
