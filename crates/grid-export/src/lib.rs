//! Export of a grid's full filtered and sorted result set.
//!
//! Cells are produced by the same render transform as on-screen cells, so an
//! exported value always equals the displayed one. Two formats are supported:
//!
//! - **CSV**: RFC 4180 quoting, `\n` row terminator
//! - **Spreadsheet**: a single named worksheet in SpreadsheetML 2003 XML
//!
//! An empty dataset produces no artifact.

pub mod artifact;
pub mod column;
pub mod csv;
pub mod error;
pub mod sheet;
pub mod sink;

pub use artifact::{ExportArtifact, ExportFormat, ExportRequest, artifact_name};
pub use column::ExportColumn;
pub use error::{ExportError, Result};
pub use sheet::{Sheet, sanitize_sheet_name, write_spreadsheet_xml};
pub use sink::{DownloadSink, ErrorReporter, ExportOutcome, TracingReporter, export_to_sink};
