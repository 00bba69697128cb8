//! XLSX extractor.
//!
//! Workbooks follow a two-sheet contract: a header sheet of two-column
//! `field, value` rows and a line-item sheet whose first row names the
//! columns. Sheets are located by name ("header"/"line", case-insensitive)
//! with positional fallback to the first and second sheet.

use calamine::{Data, Range, Reader, Xlsx, open_workbook_from_rs};
use std::io::Cursor;

use super::{LineColumns, apply_header_field};
use crate::error::ParseError;
use crate::models::{RawDocument, RawHeader, RawLine, SourceType};

pub fn extract(buffer: &[u8]) -> Result<RawDocument, ParseError> {
    let cursor = Cursor::new(buffer);
    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
        .map_err(|e: calamine::XlsxError| ParseError::WorkbookUnreadable(e.to_string()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let header_name = pick_sheet(&sheet_names, "header", 0)
        .ok_or(ParseError::MissingSheet { role: "header" })?;
    let lines_name =
        pick_sheet(&sheet_names, "line", 1).ok_or(ParseError::MissingSheet { role: "lines" })?;

    let header_range = workbook
        .worksheet_range(&header_name)
        .map_err(|e| ParseError::WorkbookUnreadable(e.to_string()))?;
    let lines_range = workbook
        .worksheet_range(&lines_name)
        .map_err(|e| ParseError::WorkbookUnreadable(e.to_string()))?;

    let header = parse_header_sheet(&header_range);
    let lines = parse_lines_sheet(&lines_range);

    if lines.is_empty() {
        return Err(ParseError::NoLineItems { location: "lines sheet" });
    }

    Ok(RawDocument {
        header,
        lines,
        source_type: SourceType::Xlsx,
        raw: serde_json::json!({ "sheets": sheet_names }),
    })
}

/// Find a sheet whose name contains `marker` (case-insensitive), falling
/// back to the sheet at `position`.
fn pick_sheet(names: &[String], marker: &str, position: usize) -> Option<String> {
    names
        .iter()
        .find(|name| name.to_lowercase().contains(marker))
        .or_else(|| names.get(position))
        .cloned()
}

/// Header sheet: column A is the field name, column B the value. Unknown
/// field names are ignored.
fn parse_header_sheet(range: &Range<Data>) -> RawHeader {
    let mut header = RawHeader::default();
    for row in range.rows() {
        let (Some(key), Some(value)) = (row.first(), row.get(1)) else {
            continue;
        };
        let key = cell_to_string(key);
        let value = cell_to_string(value);
        if key.is_empty() || value.is_empty() {
            continue;
        }
        apply_header_field(&mut header, &key, &value);
    }
    header
}

/// Line sheet: first row is the header, resolved through the alias map;
/// fully empty rows are skipped.
fn parse_lines_sheet(range: &Range<Data>) -> Vec<RawLine> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
    let columns = LineColumns::resolve(&headers);
    if columns.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for row in rows {
        let values: Vec<String> = row.iter().map(cell_to_string).collect();
        if values.iter().all(|v| v.is_empty()) {
            continue;
        }
        lines.push(columns.raw_line(&values));
    }
    lines
}

/// Render a calamine cell as the string the normalizer will coerce.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Avoid a trailing ".0" for whole numbers
            if *f == (*f as i64) as f64 && f.abs() < i64::MAX as f64 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}
