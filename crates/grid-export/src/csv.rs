//! CSV serialization.

use std::io::Write;

use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use grid_model::NormalizedRecord;

use crate::column::ExportColumn;
use crate::error::{ExportError, Result};

/// Write a header of labels followed by one row per record.
///
/// A lone empty cell is written as `""` so the row is not read back as a
/// blank line.
pub fn write_csv<W: Write>(
    writer: W,
    columns: &[ExportColumn],
    records: &[&NormalizedRecord],
) -> Result<()> {
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(columns.iter().map(|column| column.label.as_str()))?;
    for record in records {
        csv.write_record(columns.iter().map(|column| column.cell(record)))?;
    }
    csv.flush()?;
    Ok(())
}

/// Render CSV into a string.
pub fn to_csv_string(columns: &[ExportColumn], records: &[&NormalizedRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, columns, records)?;
    String::from_utf8(buffer).map_err(ExportError::Encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_model::FieldValue;

    fn column(key: &str, label: &str) -> ExportColumn {
        ExportColumn {
            key: key.into(),
            label: label.into(),
            transform: None,
            numeric: false,
        }
    }

    #[test]
    fn quotes_only_when_needed() {
        let columns = vec![column("name", "Name"), column("size", "Size")];
        let mut record = NormalizedRecord::default();
        record.insert("name", FieldValue::Text("say \"hi\", then\nleave".into()));
        record.insert("size", FieldValue::Number(8.0));
        let empty = NormalizedRecord::default();

        let csv = to_csv_string(&columns, &[&record, &empty]).unwrap();
        assert_eq!(csv, "Name,Size\n\"say \"\"hi\"\", then\nleave\",8\n,\n");
    }

    #[test]
    fn single_empty_column_keeps_its_row() {
        let columns = vec![column("name", "Name")];
        let mut named = NormalizedRecord::default();
        named.insert("name", FieldValue::Text("web".into()));
        let unnamed = NormalizedRecord::default();

        let csv = to_csv_string(&columns, &[&named, &unnamed]).unwrap();
        assert_eq!(csv, "Name\nweb\n\"\"\n");

        let cells: Vec<String> = ::csv::Reader::from_reader(csv.as_bytes())
            .records()
            .map(|row| row.unwrap()[0].to_string())
            .collect();
        assert_eq!(cells, ["web", ""]);
    }
}
