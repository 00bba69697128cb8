//! Error types for the shipdoc-core library.

use thiserror::Error;

/// Main error type for the ingestion pipeline.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Input rejected before any parsing work.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Format-specific extraction or structural-validation failure.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// OCR sidecar failure surfaced outside the PDF fallback path.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),
}

/// Errors raised by the pre-parse input guards.
#[derive(Error, Debug)]
pub enum InputError {
    /// The caller handed us a zero-length buffer.
    #[error("refusing to parse an empty buffer")]
    EmptyBuffer,

    /// The buffer exceeds the ingestion size cap.
    #[error("file is {size} bytes, exceeding the {limit} byte limit")]
    BufferTooLarge { size: usize, limit: usize },

    /// The file type is not one the pipeline understands.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
}

/// Errors raised while extracting a raw document from a specific format.
///
/// Every variant carries a stable string code (see [`ParseError::code`]);
/// schema-gate failures additionally carry the structural violation list
/// (see [`ParseError::details`]).
#[derive(Error, Debug)]
pub enum ParseError {
    /// Native PDF text extraction failed and the OCR fallback could not
    /// recover it. `reason` includes the OCR failure annotation.
    #[error("failed to extract text from PDF: {reason}")]
    PdfParseFailed { reason: String, pdf_magic: bool },

    /// The Excel workbook could not be opened at all.
    #[error("failed to read workbook: {0}")]
    WorkbookUnreadable(String),

    /// A worksheet the two-sheet contract requires is absent.
    #[error("workbook is missing the required {role} sheet")]
    MissingSheet { role: &'static str },

    /// The CSV payload could not be parsed as a record table.
    #[error("failed to parse CSV: {0}")]
    CsvUnreadable(String),

    /// The DOCX archive or its document XML could not be read.
    #[error("failed to read DOCX document: {0}")]
    DocxUnreadable(String),

    /// The source yielded an empty line-item table.
    #[error("no line items found in {location}")]
    NoLineItems { location: &'static str },

    /// The assembled document violated the canonical invariants. This is
    /// an internal contract bug in an extractor or the normalizer, never a
    /// data-quality problem.
    #[error("canonical document failed structural validation")]
    SchemaViolations { violations: Vec<String> },
}

impl ParseError {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::PdfParseFailed { pdf_magic: true, .. } => "PDF_PARSE_FAILED",
            ParseError::PdfParseFailed { pdf_magic: false, .. } => "PDF_UNREADABLE",
            ParseError::WorkbookUnreadable(_) => "WORKBOOK_UNREADABLE",
            ParseError::MissingSheet { .. } => "MISSING_SHEET",
            ParseError::CsvUnreadable(_) => "CSV_UNREADABLE",
            ParseError::DocxUnreadable(_) => "DOCX_UNREADABLE",
            ParseError::NoLineItems { .. } => "NO_LINE_ITEMS",
            ParseError::SchemaViolations { .. } => "SCHEMA_VIOLATION",
        }
    }

    /// Structural violation details, when this is a schema-gate failure.
    pub fn details(&self) -> Option<&[String]> {
        match self {
            ParseError::SchemaViolations { violations } => Some(violations),
            _ => None,
        }
    }
}

/// Errors from the external OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Network-level failure (connect, timeout, body read).
    #[error("OCR request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The OCR service answered with a non-2xx status.
    #[error("OCR service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The OCR response was 2xx but carried no extracted text.
    #[error("OCR response did not contain extracted text")]
    MissingText,
}

/// Result type for the shipdoc-core library.
pub type Result<T> = std::result::Result<T, IngestError>;
