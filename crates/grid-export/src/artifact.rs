//! Export artifacts and the export entry point.

use chrono::{DateTime, Utc};
use grid_model::{FieldDescriptor, GridSchema, NormalizedRecord};
use serde::{Deserialize, Serialize};

use crate::column::ExportColumn;
use crate::csv::write_csv;
use crate::error::Result;
use crate::sheet::{Sheet, write_spreadsheet_xml};

/// Export file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    /// SpreadsheetML workbook.
    Sheet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Sheet];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Sheet => "xml",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Sheet => "application/vnd.ms-excel",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Sheet => "Spreadsheet (XML)",
        }
    }
}

/// `<resource-type>-<YYYYMMDD-HHMMSS>.<ext>`
pub fn artifact_name(resource_type: &str, format: ExportFormat, timestamp: DateTime<Utc>) -> String {
    format!(
        "{resource_type}-{}.{}",
        timestamp.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// A serialized export ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    /// Data rows, excluding the header.
    pub rows: usize,
}

/// Everything needed to export one grid.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub resource_type: &'a str,
    pub sheet_name: &'a str,
    pub columns: Vec<ExportColumn>,
    /// The full filtered and sorted set, never a single page.
    pub records: &'a [&'a NormalizedRecord],
    pub format: ExportFormat,
    pub timestamp: DateTime<Utc>,
}

impl<'a> ExportRequest<'a> {
    /// Export the visible fields of a schema.
    pub fn new(
        schema: &'a GridSchema,
        fields: &[&FieldDescriptor],
        records: &'a [&'a NormalizedRecord],
        format: ExportFormat,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            resource_type: &schema.resource_type,
            sheet_name: &schema.title,
            columns: ExportColumn::from_fields(fields.iter().copied()),
            records,
            format,
            timestamp,
        }
    }

    /// Serialize the records. Returns `None` when there is nothing to export.
    pub fn export(&self) -> Result<Option<ExportArtifact>> {
        if self.records.is_empty() {
            tracing::debug!(resource_type = self.resource_type, "nothing to export");
            return Ok(None);
        }

        let bytes = match self.format {
            ExportFormat::Csv => {
                let mut buffer = Vec::new();
                write_csv(&mut buffer, &self.columns, self.records)?;
                buffer
            }
            ExportFormat::Sheet => {
                let sheet = Sheet::build(self.sheet_name, &self.columns, self.records);
                write_spreadsheet_xml(Vec::new(), &sheet)?
            }
        };

        Ok(Some(ExportArtifact {
            file_name: artifact_name(self.resource_type, self.format, self.timestamp),
            mime_type: self.format.mime_type(),
            bytes,
            rows: self.records.len(),
        }))
    }
}
