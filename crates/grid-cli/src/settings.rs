//! Persistent CLI settings.
//!
//! Stored as `settings.toml` in the platform config directory. Missing or
//! unreadable files fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use grid_export::ExportFormat;
use grid_model::GridConfig;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.toml";
pub const PREFERENCES_FILE: &str = "preferences.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridConfig,
    pub data: DataSettings,
    pub export: ExportSettings,
}

/// Where resource listings are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding one `<ResourceType>.json` per type.
    pub dir: PathBuf,
    /// Seconds to wait for a listing before giving up.
    pub fetch_timeout_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            fetch_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub dir: PathBuf,
    pub format: ExportFormat,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            format: ExportFormat::Csv,
        }
    }
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), %error, "ignoring unreadable settings");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serialize settings")?;
        fs::write(path, content).with_context(|| format!("write {}", path.display()))
    }

    /// Platform config directory for the tool.
    pub fn config_dir() -> PathBuf {
        directories::ProjectDirs::from("io", "InventoryDashboard", "inventory-grid")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join(SETTINGS_FILE)
    }

    /// Column preferences live next to the settings file.
    pub fn preferences_path(settings_path: &Path) -> PathBuf {
        settings_path
            .parent()
            .map(|dir| dir.join(PREFERENCES_FILE))
            .unwrap_or_else(|| PathBuf::from(PREFERENCES_FILE))
    }
}
