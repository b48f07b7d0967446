//! Export errors.

use grid_model::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("failed to write spreadsheet XML: {message}")]
    Xml { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output is not valid UTF-8")]
    Encoding(#[source] std::string::FromUtf8Error),
}

impl ExportError {
    pub(crate) fn xml(error: impl std::fmt::Display) -> Self {
        Self::Xml {
            message: error.to_string(),
        }
    }
}

impl From<ExportError> for GridError {
    fn from(error: ExportError) -> Self {
        GridError::export(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
