//! Delivery of artifacts and reporting of export failures.

use grid_model::GridError;

use crate::artifact::{ExportArtifact, ExportRequest};

/// Receives finished artifacts (a browser download, a file on disk, ...).
pub trait DownloadSink {
    fn deliver(&self, artifact: &ExportArtifact) -> grid_model::Result<()>;
}

/// Surfaces failures to the user.
pub trait ErrorReporter {
    fn report(&self, error: &GridError);
}

/// Logs failures at `error` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &GridError) {
        tracing::error!(%error, "export failed");
    }
}

/// Result of [`export_to_sink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Delivered { file_name: String, rows: usize },
    /// No records matched; nothing was delivered.
    Empty,
    /// The failure was already reported.
    Failed,
}

/// Build an artifact and hand it to `sink`. Failures are reported exactly
/// once and never propagate.
pub fn export_to_sink(
    request: &ExportRequest<'_>,
    sink: &dyn DownloadSink,
    reporter: &dyn ErrorReporter,
) -> ExportOutcome {
    let artifact = match request.export() {
        Ok(Some(artifact)) => artifact,
        Ok(None) => return ExportOutcome::Empty,
        Err(error) => {
            reporter.report(&error.into());
            return ExportOutcome::Failed;
        }
    };

    match sink.deliver(&artifact) {
        Ok(()) => {
            tracing::info!(
                resource_type = request.resource_type,
                file = %artifact.file_name,
                rows = artifact.rows,
                "export delivered"
            );
            ExportOutcome::Delivered {
                file_name: artifact.file_name,
                rows: artifact.rows,
            }
        }
        Err(error) => {
            reporter.report(&error);
            ExportOutcome::Failed
        }
    }
}
