//! DOCX extractor.
//!
//! A .docx file is an OPC zip whose main part, `word/document.xml`, holds
//! the WordprocessingML body. The extractor walks that XML once: top-level
//! paragraph text is scanned for `key: value` header lines, and the first
//! table supplies the line items as fixed-position rows
//! (part, description, quantity, weight, value, HTS, origin).

use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};

use super::apply_header_field;
use crate::error::ParseError;
use crate::models::{RawDocument, RawHeader, RawLine, SourceType};

/// Column count a table row must have to be read as a line item.
const LINE_ITEM_COLUMNS: usize = 7;

pub fn extract(buffer: &[u8]) -> Result<RawDocument, ParseError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(buffer))
        .map_err(|e| ParseError::DocxUnreadable(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ParseError::DocxUnreadable(format!("missing document part: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ParseError::DocxUnreadable(e.to_string()))?;

    let body = parse_document_xml(&xml)?;

    let mut header = RawHeader::default();
    for paragraph in &body.paragraphs {
        let Some((key, value)) = paragraph.split_once(':') else {
            continue;
        };
        apply_header_field(&mut header, key, value);
    }

    let lines = body
        .tables
        .first()
        .map(|table| table_lines(table))
        .unwrap_or_default();

    if lines.is_empty() {
        return Err(ParseError::NoLineItems { location: "DOCX table" });
    }

    Ok(RawDocument {
        header,
        lines,
        source_type: SourceType::Docx,
        raw: serde_json::json!({
            "paragraphs": body.paragraphs.len(),
            "tables": body.tables.len(),
        }),
    })
}

/// Rows after the header row, in document order. Rows with fewer than the
/// required columns are skipped rather than guessed at.
fn table_lines(table: &[Vec<String>]) -> Vec<RawLine> {
    table
        .iter()
        .skip(1)
        .filter(|cells| cells.len() >= LINE_ITEM_COLUMNS)
        .map(|cells| RawLine {
            part_number: cells[0].clone(),
            description: cells[1].clone(),
            quantity: cells[2].clone(),
            net_weight: cells[3].clone(),
            value: cells[4].clone(),
            hts_code: cells[5].clone(),
            country_of_origin: cells[6].clone(),
            purchase_order_number: cells.get(7).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Flattened document body: top-level paragraph texts plus tables as
/// row-major cell text.
#[derive(Debug, Default)]
struct DocumentBody {
    paragraphs: Vec<String>,
    tables: Vec<Vec<Vec<String>>>,
}

/// Single pass over the WordprocessingML body. Text runs (`w:t`) append to
/// the current cell when inside a table, otherwise to the current
/// paragraph. Nested tables fold into the enclosing cell's text.
fn parse_document_xml(xml: &str) -> Result<DocumentBody, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut body = DocumentBody::default();

    let mut table_depth = 0usize;
    let mut current_table: Vec<Vec<String>> = Vec::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut cell_text = String::new();
    let mut paragraph_text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => match element.name().as_ref() {
                b"w:tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        current_table = Vec::new();
                    }
                }
                b"w:tr" if table_depth == 1 => current_row = Vec::new(),
                b"w:tc" if table_depth == 1 => cell_text.clear(),
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::Text(text)) if in_text_run => {
                let decoded = text
                    .unescape()
                    .map_err(|e| ParseError::DocxUnreadable(format!("invalid XML text: {e}")))?;
                if table_depth > 0 {
                    cell_text.push_str(&decoded);
                } else {
                    paragraph_text.push_str(&decoded);
                }
            }
            Ok(Event::End(element)) => match element.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" if table_depth == 0 => {
                    let text = paragraph_text.trim().to_string();
                    if !text.is_empty() {
                        body.paragraphs.push(text);
                    }
                    paragraph_text.clear();
                }
                b"w:tc" if table_depth == 1 => {
                    current_row.push(cell_text.trim().to_string());
                }
                b"w:tr" if table_depth == 1 => {
                    if !current_row.is_empty() {
                        current_table.push(std::mem::take(&mut current_row));
                    }
                }
                b"w:tbl" => {
                    table_depth = table_depth.saturating_sub(1);
                    if table_depth == 0 {
                        body.tables.push(std::mem::take(&mut current_table));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ParseError::DocxUnreadable(format!(
                    "invalid document XML: {e}"
                )));
            }
        }
    }

    Ok(body)
}
