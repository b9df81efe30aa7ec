//! File operations module for findmark
//!
//! This module provides native open/save dialogs and the read/write helpers
//! that turn I/O failures into crate errors carrying the path.

pub mod dialogs;

use crate::error::{Error, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Read a document from disk.
pub fn read_document(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Opened file: {}", path.display());
    Ok(content)
}

/// Write a document to disk.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Saved file: {}", path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
