//! Export delivery into a local directory.

use std::fs;
use std::path::{Path, PathBuf};

use grid_export::{DownloadSink, ExportArtifact};

#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, artifact: &ExportArtifact) -> PathBuf {
        self.dir.join(&artifact.file_name)
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> grid_model::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(artifact), &artifact.bytes)?;
        Ok(())
    }
}
