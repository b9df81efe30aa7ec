//! User settings and preferences for findmark
//!
//! This module defines the `Settings` struct that holds the search defaults,
//! the highlight preferences and the editor window preferences, with serde
//! support for JSON persistence.

use crate::highlight::markers::MarkerStyle;
use crate::highlight::HighlightStrategy;
use crate::search::SearchOptions;
use crate::session::SessionConfig;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Window Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
/// Search and replacement terms are deliberately not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Search Defaults
    // ─────────────────────────────────────────────────────────────────────────
    /// Interpret the search term as a regular expression
    pub use_regex: bool,

    /// Match case exactly
    pub case_sensitive: bool,

    /// Only match whole words
    pub whole_word: bool,

    /// Restrict search and replace to the selection
    pub restrict_to_selection: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Highlighting
    // ─────────────────────────────────────────────────────────────────────────
    /// How matches are highlighted
    pub highlight_strategy: HighlightStrategy,

    /// Opening delimiter for the text marker strategy
    pub marker_open: String,

    /// Closing delimiter for the text marker strategy
    pub marker_close: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Editor
    // ─────────────────────────────────────────────────────────────────────────
    /// Font size for the editor (in points)
    pub font_size: f32,

    /// Whether to enable word wrap
    pub word_wrap: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size and position
    pub window_size: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        let markers = MarkerStyle::default();
        Self {
            // Search Defaults
            use_regex: false,
            case_sensitive: true,
            whole_word: false,
            restrict_to_selection: false,

            // Highlighting
            highlight_strategy: HighlightStrategy::default(),
            marker_open: markers.open,
            marker_close: markers.close,

            // Editor
            font_size: 14.0,
            word_wrap: true,

            // Window State
            window_size: WindowSize::default(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        // Clamp font size
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        // Clamp window size
        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        // Empty markers could never be found again when clearing
        let defaults = MarkerStyle::default();
        if self.marker_open.is_empty() {
            self.marker_open = defaults.open;
        }
        if self.marker_close.is_empty() {
            self.marker_close = defaults.close;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// The marker delimiters as a style.
    pub fn marker_style(&self) -> MarkerStyle {
        MarkerStyle {
            open: self.marker_open.clone(),
            close: self.marker_close.clone(),
        }
    }

    /// Build the configuration for a new search session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            use_regex: self.use_regex,
            options: SearchOptions {
                case_sensitive: self.case_sensitive,
                whole_word: self.whole_word,
            },
            restrict_to_selection: self.restrict_to_selection,
            highlight_strategy: self.highlight_strategy,
            marker_style: self.marker_style(),
        }
    }

    /// Copy the toggles a session changed back into the settings.
    ///
    /// Returns whether anything changed.
    pub fn remember_session(&mut self, config: &SessionConfig) -> bool {
        let before = (
            self.use_regex,
            self.case_sensitive,
            self.whole_word,
            self.restrict_to_selection,
        );
        self.use_regex = config.use_regex;
        self.case_sensitive = config.options.case_sensitive;
        self.whole_word = config.options.whole_word;
        self.restrict_to_selection = config.restrict_to_selection;
        before
            != (
                self.use_regex,
                self.case_sensitive,
                self.whole_word,
                self.restrict_to_selection,
            )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.use_regex);
        assert!(settings.case_sensitive);
        assert!(!settings.whole_word);
        assert!(!settings.restrict_to_selection);
        assert_eq!(settings.highlight_strategy, HighlightStrategy::Decorations);
        assert_eq!(settings.marker_open, "==");
        assert_eq!(settings.marker_close, "==");
        assert_eq!(settings.font_size, 14.0);
        assert!(settings.word_wrap);
    }

    #[test]
    fn test_highlight_strategy_serialization() {
        assert_eq!(
            serde_json::to_string(&HighlightStrategy::Markers).unwrap(),
            "\"markers\""
        );
        let strategy: HighlightStrategy = serde_json::from_str("\"decorations\"").unwrap();
        assert_eq!(strategy, HighlightStrategy::Decorations);
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let settings = Settings {
            use_regex: true,
            highlight_strategy: HighlightStrategy::Markers,
            marker_open: "[[".to_string(),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"use_regex": true}"#).unwrap();
        assert!(settings.use_regex);
        assert!(settings.case_sensitive);
        assert_eq!(settings.marker_open, "==");
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_search_terms_are_not_persisted() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(!json.contains("search_term"));
        assert!(!json.contains("replacement"));
    }

    #[test]
    fn test_sanitize_font_size() {
        let mut settings = Settings {
            font_size: 2.0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);

        settings.font_size = 200.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
    }

    #[test]
    fn test_sanitize_empty_markers() {
        let mut settings = Settings {
            marker_open: String::new(),
            marker_close: String::new(),
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.marker_style(), MarkerStyle::default());
    }

    #[test]
    fn test_session_config() {
        let settings = Settings {
            use_regex: true,
            case_sensitive: false,
            ..Settings::default()
        };
        let config = settings.session_config();
        assert!(config.use_regex);
        assert!(!config.options.case_sensitive);
        assert!(!config.options.whole_word);
        assert_eq!(config.highlight_strategy, HighlightStrategy::Decorations);
    }

    #[test]
    fn test_remember_session() {
        let mut settings = Settings::default();
        let mut config = settings.session_config();
        assert!(!settings.remember_session(&config));

        config.use_regex = true;
        assert!(settings.remember_session(&config));
        assert!(settings.use_regex);
    }
}
