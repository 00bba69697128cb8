//! Core library for shipment document ingestion.
//!
//! This crate turns heterogeneous uploads (PDF, XLSX, CSV, DOCX) into one
//! canonical, validated shipment-document record:
//! - Format extractors with per-layout heuristics (and OCR fallback for
//!   PDFs that yield no native text)
//! - Free-text address parsing and loose numeric coercion
//! - Normalization into a strict canonical schema with derived checksums
//! - Compliance validation (HTS, country of origin, weight, value,
//!   description, date rules)
//! - A schema gate guaranteeing the shape every consumer relies on

pub mod address;
pub mod coerce;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod ocr;
pub mod pipeline;
pub mod schema;
pub mod validation;

pub use address::{AddressParser, CountryTables};
pub use error::{IngestError, InputError, OcrError, ParseError, Result};
pub use models::{
    Address, CanonicalDocument, Checksums, Header, LineItem, Meta, RawDocument, RawHeader,
    RawLine, Severity, SourceType, ValidationIssue,
};
pub use normalize::normalize_document;
pub use ocr::{HttpOcrProvider, OcrConfig, OcrProvider};
pub use pipeline::{Ingestor, MAX_BUFFER_BYTES, parse_file};
pub use validation::{CatalogEntry, ComplianceValidator};
