//! Export columns.

use grid_model::{FieldDescriptor, NormalizedRecord, Transform, ValueKind};

/// One exported column, carrying the field's render transform.
#[derive(Debug, Clone)]
pub struct ExportColumn {
    pub key: String,
    pub label: String,
    pub transform: Option<Transform>,
    /// Cells are plain numbers and may be typed as such in spreadsheets.
    pub numeric: bool,
}

impl ExportColumn {
    pub fn from_field(field: &FieldDescriptor) -> Self {
        Self {
            key: field.key.clone(),
            label: field.label.clone(),
            transform: field.transform.clone(),
            numeric: field.kind == ValueKind::Number && field.transform.is_none(),
        }
    }

    /// Columns for the visible fields, in the given order.
    pub fn from_fields<'f>(fields: impl IntoIterator<Item = &'f FieldDescriptor>) -> Vec<Self> {
        fields.into_iter().map(Self::from_field).collect()
    }

    /// Cell text; identical to the on-screen rendering of the field.
    pub fn cell(&self, record: &NormalizedRecord) -> String {
        match &self.transform {
            Some(transform) => transform(record),
            None => record.get(&self.key).display_text(),
        }
    }
}
