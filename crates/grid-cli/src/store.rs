//! Resource listings read from a directory of JSON files.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use grid_model::{GridError, RawRecord, ResourceStore, Result};
use serde::Deserialize;

/// Either a bare array of records or an `{"items": [...]}` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Records(Vec<RawRecord>),
    Envelope { items: Vec<RawRecord> },
}

/// Reads `<dir>/<ResourceType>.json` on every call.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, resource_type: &str) -> PathBuf {
        self.dir.join(format!("{resource_type}.json"))
    }
}

impl ResourceStore for JsonDirStore {
    fn list_by_type(&self, resource_type: &str) -> Result<Vec<RawRecord>> {
        let path = self.path_for(resource_type);
        let fetch_error =
            |error: &dyn Display| GridError::fetch(resource_type, format!("{}: {error}", path.display()));
        let content = fs::read_to_string(&path).map_err(|error| fetch_error(&error))?;
        let listing: Listing =
            serde_json::from_str(&content).map_err(|error| fetch_error(&error))?;
        let records = match listing {
            Listing::Records(records) | Listing::Envelope { items: records } => records,
        };
        tracing::debug!(
            resource_type,
            records = records.len(),
            path = %path.display(),
            "read listing"
        );
        Ok(records)
    }

    fn invalidate(&self, _resource_type: &str) {}
}
