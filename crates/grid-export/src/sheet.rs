//! Single-sheet workbooks in SpreadsheetML 2003 XML.
//!
//! The format is plain XML that spreadsheet applications open as a workbook,
//! so it is written with the same `quick-xml` event writer used for other XML
//! outputs.

use std::io::Write;

use grid_model::NormalizedRecord;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use crate::column::ExportColumn;
use crate::error::{ExportError, Result};

/// SpreadsheetML namespace.
pub const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";

/// Longest worksheet name spreadsheet applications accept.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

const HEADER_STYLE_ID: &str = "header";

/// Drop characters XML 1.0 cannot carry: C0 controls other than tab, LF and
/// CR, and the U+FFFE/U+FFFF noncharacters.
pub fn xml_text(text: &str) -> String {
    text.chars().filter(|c| is_xml_char(*c)).collect()
}

fn is_xml_char(c: char) -> bool {
    !matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}

/// Strip characters worksheets reject and truncate to 31 characters.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c) && !c.is_control())
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned.to_string()
    }
}

/// One named worksheet of rendered cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Column indexes typed as numbers.
    pub numeric_columns: Vec<usize>,
}

impl Sheet {
    pub fn build(name: &str, columns: &[ExportColumn], records: &[&NormalizedRecord]) -> Self {
        Self {
            name: sanitize_sheet_name(name),
            header: columns.iter().map(|column| xml_text(&column.label)).collect(),
            rows: records
                .iter()
                .map(|record| {
                    columns
                        .iter()
                        .map(|column| xml_text(&column.cell(record)))
                        .collect()
                })
                .collect(),
            numeric_columns: columns
                .iter()
                .enumerate()
                .filter(|(_, column)| column.numeric)
                .map(|(index, _)| index)
                .collect(),
        }
    }

    fn cell_type(&self, index: usize, text: &str) -> &'static str {
        if self.numeric_columns.contains(&index) && text.parse::<f64>().is_ok() {
            "Number"
        } else {
            "String"
        }
    }
}

/// Serialize a sheet as a SpreadsheetML workbook.
pub fn write_spreadsheet_xml<W: Write>(writer: W, sheet: &Sheet) -> Result<W> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(ExportError::xml)?;
    xml.write_event(Event::PI(BytesPI::new("mso-application progid=\"Excel.Sheet\"")))
        .map_err(ExportError::xml)?;

    let mut workbook = BytesStart::new("Workbook");
    workbook.push_attribute(("xmlns", SPREADSHEET_NS));
    workbook.push_attribute(("xmlns:ss", SPREADSHEET_NS));
    xml.write_event(Event::Start(workbook))
        .map_err(ExportError::xml)?;

    write_styles(&mut xml)?;

    let mut worksheet = BytesStart::new("Worksheet");
    worksheet.push_attribute(("ss:Name", sheet.name.as_str()));
    xml.write_event(Event::Start(worksheet))
        .map_err(ExportError::xml)?;
    xml.write_event(Event::Start(BytesStart::new("Table")))
        .map_err(ExportError::xml)?;

    let mut header = BytesStart::new("Row");
    header.push_attribute(("ss:StyleID", HEADER_STYLE_ID));
    xml.write_event(Event::Start(header))
        .map_err(ExportError::xml)?;
    for label in &sheet.header {
        write_cell(&mut xml, "String", label)?;
    }
    xml.write_event(Event::End(BytesEnd::new("Row")))
        .map_err(ExportError::xml)?;

    for row in &sheet.rows {
        xml.write_event(Event::Start(BytesStart::new("Row")))
            .map_err(ExportError::xml)?;
        for (index, text) in row.iter().enumerate() {
            write_cell(&mut xml, sheet.cell_type(index, text), text)?;
        }
        xml.write_event(Event::End(BytesEnd::new("Row")))
            .map_err(ExportError::xml)?;
    }

    xml.write_event(Event::End(BytesEnd::new("Table")))
        .map_err(ExportError::xml)?;
    xml.write_event(Event::End(BytesEnd::new("Worksheet")))
        .map_err(ExportError::xml)?;
    xml.write_event(Event::End(BytesEnd::new("Workbook")))
        .map_err(ExportError::xml)?;

    Ok(xml.into_inner())
}

fn write_styles<W: Write>(xml: &mut Writer<W>) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("Styles")))
        .map_err(ExportError::xml)?;
    let mut style = BytesStart::new("Style");
    style.push_attribute(("ss:ID", HEADER_STYLE_ID));
    xml.write_event(Event::Start(style))
        .map_err(ExportError::xml)?;
    let mut font = BytesStart::new("Font");
    font.push_attribute(("ss:Bold", "1"));
    xml.write_event(Event::Empty(font))
        .map_err(ExportError::xml)?;
    xml.write_event(Event::End(BytesEnd::new("Style")))
        .map_err(ExportError::xml)?;
    xml.write_event(Event::End(BytesEnd::new("Styles")))
        .map_err(ExportError::xml)?;
    Ok(())
}

fn write_cell<W: Write>(xml: &mut Writer<W>, cell_type: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("Cell")))
        .map_err(ExportError::xml)?;
    let mut data = BytesStart::new("Data");
    data.push_attribute(("ss:Type", cell_type));
    xml.write_event(Event::Start(data))
        .map_err(ExportError::xml)?;
    xml.write_event(Event::Text(BytesText::new(text)))
        .map_err(ExportError::xml)?;
    xml.write_event(Event::End(BytesEnd::new("Data")))
        .map_err(ExportError::xml)?;
    xml.write_event(Event::End(BytesEnd::new("Cell")))
        .map_err(ExportError::xml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sanitize_sheet_name("Backup [Plans]: a/b"), "Backup Plans ab");
        assert_eq!(sanitize_sheet_name("???"), "Sheet1");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).len(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(xml_text("a\u{0}b\u{1b}[0mc\u{ffff}"), "ab[0mc");
        assert_eq!(xml_text("line\tone\r\nline two"), "line\tone\r\nline two");
        assert_eq!(sanitize_sheet_name("EC2\u{8}Instance"), "EC2Instance");
    }

    #[test]
    fn built_sheet_serializes_without_control_characters() {
        let columns = vec![ExportColumn {
            key: "name".into(),
            label: "Name\u{1}".into(),
            transform: None,
            numeric: false,
        }];
        let mut record = NormalizedRecord::default();
        record.insert("name", grid_model::FieldValue::Text("web\u{0}\u{1f}-01".into()));

        let sheet = Sheet::build("Instances", &columns, &[&record]);
        assert_eq!(sheet.header, ["Name"]);
        assert_eq!(sheet.rows, [["web-01"]]);

        let xml = String::from_utf8(write_spreadsheet_xml(Vec::new(), &sheet).unwrap()).unwrap();
        assert!(xml.contains("web-01"));
        assert!(!xml.chars().any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r')));
    }

    #[test]
    fn numeric_columns_only_type_parseable_text() {
        let sheet = Sheet {
            name: "s".into(),
            header: vec!["n".into()],
            rows: Vec::new(),
            numeric_columns: vec![0],
        };
        assert_eq!(sheet.cell_type(0, "12.5"), "Number");
        assert_eq!(sheet.cell_type(0, ""), "String");
        assert_eq!(sheet.cell_type(1, "3"), "String");
    }
}
