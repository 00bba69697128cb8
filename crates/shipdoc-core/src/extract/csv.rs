//! CSV extractor.
//!
//! Accepts an optional `#`-prefixed header-metadata block separated from
//! the line-item table by a blank line:
//!
//! ```text
//! # Shipper: Acme Exports
//! # Currency: usd
//!
//! partNumber,description,quantity,...
//! W123,Widget Assembly,10,...
//! ```
//!
//! A payload without a metadata block is treated as the bare table. Column
//! names go through the shared alias map, so `HTS`/`Qty`/`COO` headings
//! work the same as their canonical spellings.

use lazy_static::lazy_static;
use regex::Regex;

use super::{LineColumns, apply_header_field};
use crate::error::ParseError;
use crate::models::{RawDocument, RawHeader, RawLine, SourceType};

lazy_static! {
    static ref BLANK_LINE: Regex = Regex::new(r"\r?\n[ \t]*\r?\n").unwrap();
}

pub fn extract(buffer: &[u8]) -> Result<RawDocument, ParseError> {
    let text = String::from_utf8_lossy(buffer);

    let (header, header_lines, table) = split_metadata(&text);

    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .flexible(true)
        .from_reader(table.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ParseError::CsvUnreadable(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let columns = LineColumns::resolve(&headers);

    let mut lines: Vec<RawLine> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ParseError::CsvUnreadable(e.to_string()))?;
        let row: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        lines.push(columns.raw_line(&row));
    }

    if lines.is_empty() {
        return Err(ParseError::NoLineItems { location: "CSV" });
    }

    Ok(RawDocument {
        header,
        lines,
        source_type: SourceType::Csv,
        raw: serde_json::json!({
            "headerLines": header_lines,
            "columnKeys": headers,
        }),
    })
}

/// Split off the leading `#` metadata block when one is present. The block
/// must be separated from the table by a blank line and actually contain
/// `#` lines; otherwise the whole payload is the table.
fn split_metadata<'a>(text: &'a str) -> (RawHeader, Vec<String>, &'a str) {
    let mut header = RawHeader::default();
    let mut header_lines = Vec::new();

    if let Some(separator) = BLANK_LINE.find(text) {
        let head = &text[..separator.start()];
        if head.lines().any(|line| line.trim_start().starts_with('#')) {
            for line in head.lines() {
                let trimmed = line.trim();
                if !trimmed.starts_with('#') {
                    continue;
                }
                header_lines.push(trimmed.to_string());
                let without_hash = trimmed.trim_start_matches('#').trim();
                if let Some((key, value)) = without_hash.split_once(':') {
                    apply_header_field(&mut header, key, value);
                }
            }
            return (header, header_lines, &text[separator.end()..]);
        }
    }

    (header, header_lines, text)
}
