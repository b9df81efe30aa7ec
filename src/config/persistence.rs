//! Configuration file persistence for findmark
//!
//! This module handles loading and saving configuration files to
//! platform-specific directories with robust error handling and
//! graceful fallback to defaults.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
pub const APP_NAME: &str = "findmark";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Backup configuration file name (used during atomic writes)
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// Returns the appropriate directory based on the operating system:
/// - **Windows**: `%APPDATA%\findmark\`
/// - **macOS**: `~/Library/Application Support/findmark/`
/// - **Linux**: `~/.config/findmark/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Ensure a configuration directory exists, creating it if necessary.
fn ensure_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        debug!("Creating config directory: {}", config_dir.display());
        fs::create_dir_all(config_dir).map_err(|e| Error::ConfigSave {
            path: config_dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default config file location.
///
/// # Behavior
///
/// 1. If the config file exists and is valid JSON, load and sanitize it
/// 2. If the config file doesn't exist, return default settings
/// 3. If the config file is corrupted/invalid, log a warning and return defaults
pub fn load_config() -> Settings {
    get_config_dir()
        .and_then(|dir| load_config_from(&dir))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load configuration from `config_dir`.
///
/// A missing or empty file yields the defaults.
///
/// # Errors
///
/// - `Error::ConfigLoad`: the file exists but cannot be read
/// - `Error::ConfigParse`: the file is not valid settings JSON
pub fn load_config_from(config_dir: &Path) -> Result<Settings> {
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", config_path.display());

    let contents = fs::read_to_string(&config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the default config file location.
///
/// # Errors
///
/// - `Error::ConfigDirNotFound`: Config directory cannot be determined
/// - `Error::ConfigSave`: Failed to write the config file
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(settings, &get_config_dir()?)
}

/// Save configuration into `config_dir`.
///
/// The JSON is written to a backup file first, which then replaces the
/// config file, so a crash mid-write never leaves a truncated config.
pub fn save_config_to(settings: &Settings, config_dir: &Path) -> Result<()> {
    ensure_dir(config_dir)?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);
    let backup_path = config_dir.join(CONFIG_BACKUP_NAME);

    debug!("Saving config to: {}", config_path.display());

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &config_path).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    info!(
        "Configuration saved successfully to {}",
        config_path.display()
    );
    Ok(())
}

/// Save configuration, ignoring errors.
///
/// Returns `true` if the save was successful, `false` otherwise.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
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

    /// Helper to create a test environment with a temporary config directory.
    struct TestEnv {
        _temp_dir: TempDir,
        config_dir: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let config_dir = temp_dir.path().join(APP_NAME);
            Self {
                _temp_dir: temp_dir,
                config_dir,
            }
        }

        fn write_config(&self, content: &str) {
            fs::create_dir_all(&self.config_dir).expect("Failed to create config dir");
            fs::write(self.config_dir.join(CONFIG_FILE_NAME), content)
                .expect("Failed to write config");
        }

        fn read_config(&self) -> String {
            fs::read_to_string(self.config_dir.join(CONFIG_FILE_NAME))
                .expect("Failed to read config")
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Platform directory tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_get_config_file_path() {
        if let Ok(path) = get_config_file_path() {
            assert!(path.to_string_lossy().contains(APP_NAME));
            assert!(path.to_string_lossy().ends_with(CONFIG_FILE_NAME));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load tests with temp directory
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let env = TestEnv::new();
        let settings = load_config_from(&env.config_dir).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_valid_config() {
        let env = TestEnv::new();
        env.write_config(r#"{"use_regex": true, "highlight_strategy": "markers"}"#);
        let settings = load_config_from(&env.config_dir).unwrap();
        assert!(settings.use_regex);
        assert_eq!(settings.highlight_strategy, HighlightStrategy::Markers);
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let env = TestEnv::new();
        env.write_config("   \n");
        let settings = load_config_from(&env.config_dir).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_corrupted_config_returns_error() {
        let env = TestEnv::new();
        env.write_config("{ not json");
        let result = load_config_from(&env.config_dir);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_config_sanitizes_values() {
        let env = TestEnv::new();
        env.write_config(r#"{"font_size": 1000.0, "marker_open": ""}"#);
        let settings = load_config_from(&env.config_dir).unwrap();
        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
        assert_eq!(settings.marker_open, "==");
    }

    #[test]
    fn test_config_with_unknown_fields_ignored() {
        let env = TestEnv::new();
        env.write_config(r#"{"whole_word": true, "theme": "dark"}"#);
        let settings = load_config_from(&env.config_dir).unwrap();
        assert!(settings.whole_word);
    }

    #[test]
    fn test_config_with_wrong_types() {
        let env = TestEnv::new();
        env.write_config(r#"{"use_regex": "yes"}"#);
        assert!(load_config_from(&env.config_dir).is_err());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_creates_dir_and_valid_json() {
        let env = TestEnv::new();
        save_config_to(&Settings::default(), &env.config_dir).unwrap();

        let json = env.read_config();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["marker_open"], "==");
        assert!(!env.config_dir.join(CONFIG_BACKUP_NAME).exists());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let env = TestEnv::new();
        let settings = Settings {
            use_regex: true,
            case_sensitive: false,
            restrict_to_selection: true,
            highlight_strategy: HighlightStrategy::Markers,
            marker_open: "<<".to_string(),
            marker_close: ">>".to_string(),
            font_size: 18.0,
            ..Settings::default()
        };
        save_config_to(&settings, &env.config_dir).unwrap();
        assert_eq!(load_config_from(&env.config_dir).unwrap(), settings);
    }

    #[test]
    fn test_save_overwrites_previous() {
        let env = TestEnv::new();
        env.write_config(r#"{"use_regex": true}"#);
        save_config_to(&Settings::default(), &env.config_dir).unwrap();
        assert!(!load_config_from(&env.config_dir).unwrap().use_regex);
    }

    #[test]
    fn test_app_name_constant() {
        assert_eq!(APP_NAME, "findmark");
    }
}
