//! # Configuration Module
//!
//! Optional user defaults for songpicker, read from a JSON file in the
//! platform-standard configuration directory:
//!
//! - Linux: `~/.config/songpicker/config.json`
//! - macOS: `~/Library/Application Support/songpicker/config.json`
//! - Windows: `%APPDATA%\songpicker\config.json`
//!
//! Every key is optional; command-line flags take precedence.
//!
//! ```json
//! {
//!   "extension": "mp3",
//!   "folder_capacity": 734003200,
//!   "recursive": true,
//!   "keep_going": false
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::export::DEFAULT_FOLDER_CAPACITY;
use crate::scan::{FailurePolicy, ScanOptions};

/// Returns the platform-appropriate configuration file path.
///
/// The file itself does not need to exist.
///
/// # Errors
///
/// Fails if the system configuration directory cannot be determined.
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system config directory. Please ensure your platform supports standard config directories."
        )
    })?;

    Ok(config_dir.join("songpicker").join("config.json"))
}

/// Defaults for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// File extension picked up from the source directory.
    pub extension: String,
    /// Byte budget of one destination folder.
    pub folder_capacity: u64,
    /// Descend into subdirectories of the source.
    pub recursive: bool,
    /// Skip unreadable files instead of aborting.
    pub keep_going: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extension: "mp3".to_string(),
            folder_capacity: DEFAULT_FOLDER_CAPACITY,
            recursive: false,
            keep_going: false,
        }
    }
}

impl Settings {
    /// Load from [`get_config_path`], falling back to defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                debug!("No config directory ({err}), using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or is not valid JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded settings from {}: {settings:?}", path.display());
        Ok(settings)
    }

    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extension: self.extension.clone(),
            recursive: self.recursive,
        }
    }

    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::Skip
        } else {
            FailurePolicy::Abort
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_path_structure() {
        if let Ok(path) = get_config_path() {
            assert!(path.ends_with("songpicker/config.json"));
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.failure_policy(), FailurePolicy::Abort);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "extension": "MP3", "keep_going": true }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.extension, "MP3");
        assert_eq!(settings.folder_capacity, DEFAULT_FOLDER_CAPACITY);
        assert_eq!(settings.failure_policy(), FailurePolicy::Skip);
        assert_eq!(settings.scan_options().extension, "MP3");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_settings_roundtrip_through_json() {
        let settings = Settings {
            recursive: true,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(serde_json::from_str::<Settings>(&json).unwrap(), settings);
    }
}
