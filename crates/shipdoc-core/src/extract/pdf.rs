//! PDF extractor.
//!
//! The least structured format: nothing but text, often reflowed by the
//! PDF's own layout. Native extraction goes through pdf-extract; when that
//! fails and an OCR provider is configured, the raw bytes are sent to the
//! sidecar and the returned text is parsed the same way.
//!
//! Header fields are scanned from the leading lines with an explicit
//! capture state machine; line items come from a two-pass scan where an
//! HTS code (and an adjoining country name) prime the context that the
//! next strict data line consumes. Lines matching neither pattern are
//! skipped — no partial or garbage lines are ever emitted.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::ParseError;
use crate::models::{RawDocument, RawHeader, RawLine, SourceType};
use crate::ocr::OcrProvider;

/// How many leading non-empty lines are scanned for header labels.
const HEADER_SCAN_LINES: usize = 60;

/// Incoterms accepted in a Trade Terms / Incoterm field. Anything else is
/// discarded rather than guessed at.
const KNOWN_INCOTERMS: &[&str] = &[
    "EXW", "FCA", "CPT", "CIP", "DAP", "DPU", "DDP", "FAS", "FOB", "CFR", "CIF", "COLLECT",
];

/// Country names recognized next to an HTS code, mapped to ISO codes.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("UNITED STATES", "US"),
    ("USA", "US"),
    ("UNITED KINGDOM", "GB"),
    ("UK", "GB"),
    ("CHINA", "CN"),
    ("JAPAN", "JP"),
    ("GERMANY", "DE"),
    ("CANADA", "CA"),
    ("AUSTRALIA", "AU"),
    ("MEXICO", "MX"),
    ("FRANCE", "FR"),
    ("ITALY", "IT"),
    ("SPAIN", "ES"),
    ("KOREA", "KR"),
    ("TAIWAN", "TW"),
    ("SINGAPORE", "SG"),
    ("MALAYSIA", "MY"),
    ("THAILAND", "TH"),
    ("VIETNAM", "VN"),
    ("INDIA", "IN"),
];

lazy_static! {
    // Dotted tariff number, e.g. 8471.50.0150
    static ref HTS_CODE: Regex = Regex::new(r"(\d{4}\.\d{2}\.\d{4})").unwrap();

    // A line-item data row: description, integer quantity, then two
    // decimals (net weight kg, value) at the very end of the line.
    static ref DATA_LINE: Regex =
        Regex::new(r"^(.*\S)\s+(\d{1,7})\s+([\d,]+\.\d+)\s+([\d,]+\.\d+)$").unwrap();

    // Part-code-shaped token leading a description.
    static ref PART_TOKEN: Regex = Regex::new(r"^([A-Z0-9][A-Z0-9\-.]{2,})\s+(\S.*)$").unwrap();

    // Purchase order references, labeled or inline.
    static ref PO_LABEL: Regex = Regex::new(r"(?i)^p/?o\s*(?:number)?\s*:\s*(\S+)").unwrap();
    static ref PO_TOKEN: Regex = Regex::new(r"\b(\d{2,}OP\d{4})\b").unwrap();
}

/// Extract a raw document from PDF bytes, with optional OCR fallback.
pub async fn extract(
    buffer: &[u8],
    ocr: Option<&dyn OcrProvider>,
) -> Result<RawDocument, ParseError> {
    let mut ocr_used = false;

    let text = match pdf_extract::extract_text_from_mem(buffer) {
        Ok(text) => text,
        Err(native_err) => {
            debug!("native PDF text extraction failed: {native_err}");
            match ocr {
                Some(provider) => match provider.extract_text(buffer).await {
                    Ok(text) => {
                        info!(
                            provider = provider.name(),
                            "recovered PDF text via OCR fallback"
                        );
                        ocr_used = true;
                        text
                    }
                    Err(ocr_err) => {
                        return Err(pdf_failure(
                            buffer,
                            &native_err.to_string(),
                            &format!("OCR fallback also failed: {ocr_err}"),
                        ));
                    }
                },
                None => {
                    return Err(pdf_failure(
                        buffer,
                        &native_err.to_string(),
                        "OCR fallback disabled",
                    ));
                }
            }
        }
    };

    let PdfHeader {
        header,
        invoice_number,
    } = parse_header(&text);
    let lines = parse_lines(&text);
    if lines.is_empty() {
        warn!("no line items recognized in PDF text; the schema gate will reject this document");
    }

    let page_count = lopdf::Document::load_mem(buffer)
        .ok()
        .map(|doc| doc.get_pages().len());

    Ok(RawDocument {
        header,
        lines,
        source_type: SourceType::Pdf,
        raw: serde_json::json!({
            "textLength": text.len(),
            "pageCount": page_count,
            "ocrUsed": ocr_used,
            "invoiceNumber": invoice_number,
        }),
    })
}

fn pdf_failure(buffer: &[u8], reason: &str, annotation: &str) -> ParseError {
    ParseError::PdfParseFailed {
        reason: format!("{reason}; {annotation}"),
        pdf_magic: buffer.starts_with(b"%PDF"),
    }
}

/// Header scan state: a consignee label switches into capture mode, and
/// the next colon-bearing line switches back out.
enum HeaderScan {
    Scanning,
    CapturingConsignee,
}

struct PdfHeader {
    header: RawHeader,
    invoice_number: String,
}

fn parse_header(text: &str) -> PdfHeader {
    let mut header = RawHeader::default();
    let mut invoice_number = String::new();
    let mut state = HeaderScan::Scanning;

    let lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(HEADER_SCAN_LINES);

    for line in lines {
        let lower = line.to_lowercase();

        if matches!(state, HeaderScan::CapturingConsignee) {
            if line.contains(':') {
                // A labeled line ends the capture; it is still processed
                // below as a label of its own.
                state = HeaderScan::Scanning;
            } else {
                if !header.consignee.is_empty() {
                    header.consignee.push_str(", ");
                }
                header.consignee.push_str(line);
                continue;
            }
        }

        if let Some(value) = strip_label(line, &lower, &["sold to:", "consigned to:", "consignee:"])
        {
            if header.consignee.is_empty() {
                header.consignee = value.to_string();
                state = HeaderScan::CapturingConsignee;
            }
        } else if let Some(value) = strip_label(line, &lower, &["shipper:", "sold by:"]) {
            if header.shipper.is_empty() {
                header.shipper = value.to_string();
            }
        } else if let Some(value) = strip_label(line, &lower, &["incoterm:", "trade terms:"]) {
            header.incoterm = value.to_string();
        } else if let Some(value) = strip_label(line, &lower, &["currency:"]) {
            header.currency = value.to_string();
        } else if let Some(value) = strip_label(line, &lower, &["reference:"]) {
            header.reference = Some(value.to_string());
        } else if let Some(value) = strip_label(line, &lower, &["invoice number:", "invoice no:"]) {
            invoice_number = value.to_string();
        }
    }

    // Keep only a recognizable incoterm.
    if !header.incoterm.is_empty() {
        let upper = header.incoterm.to_uppercase();
        if !KNOWN_INCOTERMS.iter().any(|term| upper.contains(term)) {
            header.incoterm.clear();
        }
    }

    // Currency fallback: a dollar amount anywhere in the text implies USD.
    if header.currency.is_empty() && (text.contains("USD") || text.contains('$')) {
        header.currency = "USD".to_string();
    }

    if header.reference.is_none() && !invoice_number.is_empty() {
        header.reference = Some(invoice_number.clone());
    }

    PdfHeader {
        header,
        invoice_number,
    }
}

/// Return the value after the first matching label prefix.
fn strip_label<'a>(line: &'a str, lower: &str, labels: &[&str]) -> Option<&'a str> {
    labels
        .iter()
        .find(|label| lower.starts_with(*label))
        .map(|label| line[label.len()..].trim())
}

/// Line scan state: an HTS line primes the context; the next data line
/// consumes it and resets to idle.
enum LineScan {
    Idle,
    AwaitingData { hts: String, country: String },
}

fn parse_lines(text: &str) -> Vec<RawLine> {
    let mut items = Vec::new();
    let mut state = LineScan::Idle;
    let mut current_po = String::new();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(caps) = PO_LABEL.captures(line).or_else(|| PO_TOKEN.captures(line)) {
            current_po = caps[1].to_string();
        }

        if let Some(caps) = DATA_LINE.captures(line) {
            let (hts, country) = match std::mem::replace(&mut state, LineScan::Idle) {
                LineScan::AwaitingData { hts, country } => (hts, country),
                LineScan::Idle => (String::new(), String::new()),
            };

            let (part_number, description) = split_part_number(caps[1].trim());
            items.push(RawLine {
                part_number,
                description,
                quantity: caps[2].to_string(),
                net_weight: caps[3].to_string(),
                value: caps[4].to_string(),
                hts_code: hts,
                country_of_origin: country,
                purchase_order_number: current_po.clone(),
            });
            continue;
        }

        if let Some(caps) = HTS_CODE.captures(line) {
            state = LineScan::AwaitingData {
                hts: caps[1].to_string(),
                country: find_country(line).unwrap_or_default(),
            };
        }
    }

    items
}

/// Split a part-code-shaped leading token off the description.
fn split_part_number(description: &str) -> (String, String) {
    match PART_TOKEN.captures(description) {
        Some(caps) => (caps[1].to_string(), caps[2].trim().to_string()),
        None => (String::new(), description.to_string()),
    }
}

/// Look for a known country name on the line, token-bounded so short
/// codes don't match inside longer words.
fn find_country(line: &str) -> Option<String> {
    let upper = line.to_uppercase();
    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| {
            if alias.contains(' ') {
                upper.contains(alias)
            } else {
                upper
                    .split(|c: char| !c.is_ascii_alphabetic())
                    .any(|token| token == *alias)
            }
        })
        .map(|(_, iso)| (*iso).to_string())
}
