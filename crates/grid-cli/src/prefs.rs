//! Column preferences persisted as a TOML table of namespace to value.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use grid_model::{GridError, PreferenceStore, Result};

#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Option<BTreeMap<String, String>> {
        let content = fs::read_to_string(&self.path).ok()?;
        match toml::from_str(&content) {
            Ok(entries) => Some(entries),
            Err(error) => {
                tracing::debug!(path = %self.path.display(), %error, "unreadable preferences");
                None
            }
        }
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, namespace: &str) -> Option<String> {
        self.read()?.remove(namespace)
    }

    fn set(&self, namespace: &str, value: &str) -> Result<()> {
        let failed = |message: String| GridError::Preference {
            namespace: namespace.to_string(),
            message,
        };

        let mut entries = self.read().unwrap_or_default();
        entries.insert(namespace.to_string(), value.to_string());
        let content = toml::to_string_pretty(&entries).map_err(|e| failed(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
        }
        fs::write(&self.path, content).map_err(|e| failed(e.to_string()))
    }
}
