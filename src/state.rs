//! Application state management for findmark
//!
//! This module defines the central `AppState` struct that owns the document,
//! its file path, the search session, the settings and the transient UI
//! state (find panel fields, toasts, error modal).

use crate::config::{save_config_silent, Settings};
use crate::error::{Error, Result};
use crate::files::{read_document, write_document};
use crate::host::{Document, EditorHost};
use crate::search::TextSnapshot;
use crate::session::{Notice, SearchSession};
use crate::ui::FindState;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// Transient UI state, never persisted.
#[derive(Debug, Default)]
pub struct UiState {
    /// Whether the find/replace panel is open
    pub show_find_replace: bool,
    /// Find/replace panel fields
    pub find_state: FindState,
    /// Whether to show error modal
    pub show_error_modal: bool,
    /// Error message for modal
    pub error_message: String,
    /// Temporary toast message
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// App State
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the editor window works on.
#[derive(Debug)]
pub struct AppState {
    /// The open document
    pub document: Document,
    /// Where the document lives on disk, if anywhere
    pub path: Option<PathBuf>,
    /// Snapshot of the text as last opened or saved
    saved: TextSnapshot,
    /// User settings
    pub settings: Settings,
    /// Whether settings need saving
    pub settings_dirty: bool,
    /// Find/replace session over `document`
    pub session: SearchSession,
    /// Transient UI state
    pub ui: UiState,
}

impl AppState {
    /// Create the state with an empty document.
    pub fn new(settings: Settings) -> Self {
        let session = SearchSession::new(settings.session_config());
        let ui = UiState {
            find_state: FindState {
                use_regex: settings.use_regex,
                case_sensitive: settings.case_sensitive,
                whole_word: settings.whole_word,
                restrict_to_selection: settings.restrict_to_selection,
                ..FindState::default()
            },
            ..UiState::default()
        };
        Self {
            document: Document::default(),
            path: None,
            saved: TextSnapshot::of(""),
            settings,
            settings_dirty: false,
            session,
            ui,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether the document differs from what is on disk.
    pub fn is_modified(&self) -> bool {
        !self.saved.matches(self.document.text())
    }

    /// The document's display title.
    pub fn title(&self) -> String {
        let name = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());
        if self.is_modified() {
            format!("{}*", name)
        } else {
            name
        }
    }

    /// Replace the document with the contents of `path`.
    ///
    /// Any search is closed first so highlights never outlive their document.
    pub fn open_file(&mut self, path: PathBuf) -> Result<()> {
        let content = read_document(&path)?;
        self.session.close(&mut self.document);
        self.ui.show_find_replace = false;
        self.saved = TextSnapshot::of(&content);
        self.document = Document::new(content);
        self.path = Some(path);
        Ok(())
    }

    /// Save the document to its path.
    ///
    /// Returns the path written.
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self.path.clone().ok_or_else(|| {
            Error::Application("No file path set. Use 'Save As' instead.".to_string())
        })?;
        self.save_as(path)
    }

    /// Save the document to `path` and make it the document's path.
    pub fn save_as(&mut self, path: PathBuf) -> Result<PathBuf> {
        // Text markers must never reach the disk
        self.session.clear_highlights(&mut self.document);
        write_document(&path, self.document.text())?;
        self.saved = TextSnapshot::of(self.document.text());
        self.path = Some(path.clone());
        Ok(path)
    }

    /// Directory of the current document, for file dialogs.
    pub fn document_dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Find panel
    // ─────────────────────────────────────────────────────────────────────────

    /// Push the panel's fields into the session.
    pub fn sync_find_state(&mut self) {
        let find = &self.ui.find_state;
        self.session.set_search_term(find.search_term.as_str());
        self.session.set_replacement(find.replace_term.as_str());
        self.session.set_use_regex(find.use_regex);
        self.session.set_case_sensitive(find.case_sensitive);
        self.session.set_whole_word(find.whole_word);
    }

    /// Remember the panel toggles in the settings.
    pub fn remember_find_options(&mut self) {
        if self.settings.remember_session(self.session.config()) {
            debug!("Search options changed, settings marked dirty");
            self.settings_dirty = true;
        }
    }

    /// Take the session's notices, keeping the most relevant one for display.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.session.take_notices().pop()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    /// Save settings to the config file if they changed.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty {
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                info!("Settings saved");
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    /// Final cleanup before exit.
    pub fn shutdown(&mut self) {
        self.remember_find_options();
        self.session.close(&mut self.document);
        self.save_settings_if_dirty();
        info!("AppState shutdown complete");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Show an error in a modal dialog.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui.error_message = message.into();
        self.ui.show_error_modal = true;
    }

    /// Dismiss the error modal.
    pub fn dismiss_error(&mut self) {
        self.ui.show_error_modal = false;
        self.ui.error_message.clear();
    }

    /// Show a temporary toast message (disappears after duration).
    ///
    /// `current_time` should be the current app time in seconds.
    /// `duration` is how long to show the message in seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Update toast state - clears expired toasts.
    pub fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::HighlightStrategy;
    use tempfile::TempDir;

    fn state_with(text: &str) -> AppState {
        let mut state = AppState::new(Settings::default());
        state.document = Document::new(text);
        state.saved = TextSnapshot::of(text);
        state
    }

    #[test]
    fn test_new_state_mirrors_settings() {
        let settings = Settings {
            use_regex: true,
            ..Settings::default()
        };
        let state = AppState::new(settings);
        assert!(state.ui.find_state.use_regex);
        assert!(state.ui.find_state.case_sensitive);
        assert!(state.session.config().use_regex);
        assert!(!state.is_modified());
        assert_eq!(state.title(), "Untitled");
    }

    #[test]
    fn test_open_and_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "cat bat cat").unwrap();

        let mut state = AppState::new(Settings::default());
        state.open_file(path.clone()).unwrap();
        assert_eq!(state.document.text(), "cat bat cat");
        assert_eq!(state.title(), "doc.md");

        state.document.set_text("dog".to_string());
        assert!(state.is_modified());
        assert_eq!(state.title(), "doc.md*");

        assert_eq!(state.save().unwrap(), path);
        assert!(!state.is_modified());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "dog");
    }

    #[test]
    fn test_save_without_path() {
        let mut state = state_with("x");
        assert!(matches!(state.save(), Err(Error::Application(_))));
    }

    #[test]
    fn test_open_missing_file_keeps_document() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with("keep");
        assert!(state.open_file(dir.path().join("nope.md")).is_err());
        assert_eq!(state.document.text(), "keep");
    }

    #[test]
    fn test_save_strips_text_markers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        let settings = Settings {
            highlight_strategy: HighlightStrategy::Markers,
            ..Settings::default()
        };
        let mut state = AppState::new(settings);
        state.document = Document::new("cat bat");
        state.ui.find_state.search_term = "cat".to_string();
        state.sync_find_state();
        state.session.find_all(&mut state.document);
        assert_eq!(state.document.text(), "==cat== bat");

        state.save_as(path.clone()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "cat bat");
    }

    #[test]
    fn test_sync_find_state() {
        let mut state = state_with("Cat cat");
        state.ui.find_state.search_term = "cat".to_string();
        state.ui.find_state.case_sensitive = false;
        state.sync_find_state();
        state.session.find_all(&mut state.document);
        assert_eq!(state.session.matches().len(), 2);
    }

    #[test]
    fn test_remember_find_options_marks_dirty() {
        let mut state = state_with("");
        state.ui.find_state.whole_word = true;
        state.sync_find_state();
        state.remember_find_options();
        assert!(state.settings_dirty);
        assert!(state.settings.whole_word);
    }

    #[test]
    fn test_take_notice() {
        let mut state = state_with("text");
        state.sync_find_state();
        state.session.find_all(&mut state.document);
        assert_eq!(state.take_notice(), Some(Notice::EmptySearchTerm));
        assert_eq!(state.take_notice(), None);
    }

    #[test]
    fn test_toast_expiry() {
        let mut state = state_with("");
        state.show_toast("Saved", 1.0, 2.0);
        state.update_toast(2.0);
        assert!(state.ui.toast_message.is_some());
        state.update_toast(3.0);
        assert!(state.ui.toast_message.is_none());
    }

    #[test]
    fn test_error_modal() {
        let mut state = state_with("");
        state.show_error("boom");
        assert!(state.ui.show_error_modal);
        state.dismiss_error();
        assert!(!state.ui.show_error_modal);
        assert!(state.ui.error_message.is_empty());
    }
}
