//! Configuration file persistence
//!
//! This module handles loading and saving the configuration file in the
//! platform-specific config directory, falling back to defaults whenever
//! the file is missing or unreadable.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "minimap";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Temporary file written before replacing the real config
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\minimap\`
/// - **macOS**: `~/Library/Application Support/minimap/`
/// - **Linux**: `~/.config/minimap/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("Creating config directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default location, or defaults on any failure.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load and sanitize configuration from `path`.
///
/// A missing or empty file yields defaults; invalid JSON is an error.
pub fn load_config_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            path.display(),
            e
        );
        e
    })?;

    info!("Configuration loaded from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the default location.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_in(&get_config_dir()?, settings)
}

/// Save configuration into `dir`, writing a backup file first and renaming
/// it over the real one.
pub fn save_config_in(dir: &Path, settings: &Settings) -> Result<()> {
    ensure_dir(dir)?;
    let config_path = dir.join(CONFIG_FILE_NAME);
    let backup_path = dir.join(CONFIG_BACKUP_NAME);

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

    info!("Configuration saved to {}", config_path.display());
    Ok(())
}

/// Save configuration, logging instead of returning errors.
///
/// Returns `true` if the save was successful.
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
    use crate::config::{PanelSide, Theme};
    use tempfile::TempDir;

    struct TestEnv {
        temp_dir: TempDir,
    }

    impl TestEnv {
        fn new() -> Self {
            Self {
                temp_dir: TempDir::new().expect("Failed to create temp dir"),
            }
        }

        fn dir(&self) -> PathBuf {
            self.temp_dir.path().join(APP_NAME)
        }

        fn config_file(&self) -> PathBuf {
            self.dir().join(CONFIG_FILE_NAME)
        }

        fn write_config(&self, content: &str) {
            fs::create_dir_all(self.dir()).expect("Failed to create config dir");
            fs::write(self.config_file(), content).expect("Failed to write config");
        }
    }

    #[test]
    fn test_get_config_file_path() {
        if let Ok(path) = get_config_file_path() {
            let path = path.to_string_lossy().into_owned();
            assert!(path.contains(APP_NAME));
            assert!(path.ends_with(CONFIG_FILE_NAME));
        }
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let env = TestEnv::new();
        let settings = load_config_from(&env.config_file()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let env = TestEnv::new();
        env.write_config("   \n");
        let settings = load_config_from(&env.config_file()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_corrupted_file_is_parse_error() {
        let env = TestEnv::new();
        env.write_config("{ invalid json }");
        let result = load_config_from(&env.config_file());
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_sanitizes_values() {
        let env = TestEnv::new();
        env.write_config(r#"{"minimap": {"width": 9000.0, "font_size": 0.1}}"#);
        let settings = load_config_from(&env.config_file()).unwrap();
        assert_eq!(settings.minimap.width, Settings::MAX_MINIMAP_WIDTH);
        assert_eq!(settings.minimap.font_size, Settings::MIN_MINIMAP_FONT_SIZE);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let env = TestEnv::new();
        env.write_config(r#"{"theme": "dark", "future_feature": true}"#);
        let settings = load_config_from(&env.config_file()).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn test_save_then_load() {
        let env = TestEnv::new();
        let mut original = Settings::default();
        original.theme = Theme::System;
        original.minimap.side = PanelSide::Left;
        original.minimap.sync_scroll = false;
        original.minimap.width = 200.0;

        save_config_in(&env.dir(), &original).unwrap();
        assert!(env.config_file().exists());
        assert!(!env.dir().join(CONFIG_BACKUP_NAME).exists());

        let loaded = load_config_from(&env.config_file()).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_config_graceful_fallback() {
        // Always returns usable settings regardless of what is on disk
        let settings = load_config();
        assert!(settings.editor_font_size >= Settings::MIN_FONT_SIZE);
    }
}
