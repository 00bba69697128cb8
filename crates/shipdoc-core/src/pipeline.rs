//! Ingestion entry point.
//!
//! One [`Ingestor`] serves any number of concurrent calls: every
//! `parse_file` invocation works on its own buffer and produces its own
//! document, with no shared mutable state. The only suspension point is
//! the OCR fallback inside the PDF extractor; retries and cancellation are
//! the caller's business, not the pipeline's.

use tracing::debug;

use crate::address::AddressParser;
use crate::error::{IngestError, InputError, Result};
use crate::extract;
use crate::models::{CanonicalDocument, SourceType};
use crate::normalize::normalize_document;
use crate::ocr::OcrProvider;
use crate::validation::ComplianceValidator;

/// Buffers over this size are rejected before any parsing work begins.
pub const MAX_BUFFER_BYTES: usize = 100 * 1024 * 1024;

/// Document ingestion pipeline: extractor dispatch, normalization,
/// validation, schema gate.
pub struct Ingestor {
    max_buffer_bytes: usize,
    ocr: Option<Box<dyn OcrProvider>>,
    address_parser: AddressParser,
    validator: ComplianceValidator,
}

impl Ingestor {
    pub fn new() -> Self {
        Self {
            max_buffer_bytes: MAX_BUFFER_BYTES,
            ocr: None,
            address_parser: AddressParser::new(),
            validator: ComplianceValidator::new(),
        }
    }

    /// Enable the OCR fallback for PDFs whose native text extraction fails.
    pub fn with_ocr(mut self, provider: Box<dyn OcrProvider>) -> Self {
        self.ocr = Some(provider);
        self
    }

    /// Override the buffer size cap (mostly for tests).
    pub fn with_max_buffer_bytes(mut self, limit: usize) -> Self {
        self.max_buffer_bytes = limit;
        self
    }

    /// Swap in a validator with deployment-specific code tables.
    pub fn with_validator(mut self, validator: ComplianceValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Swap in an address parser with deployment-specific country tables.
    pub fn with_address_parser(mut self, parser: AddressParser) -> Self {
        self.address_parser = parser;
        self
    }

    /// Parse one uploaded file into a canonical document.
    ///
    /// Rejects empty and oversized buffers up front. Extraction failures
    /// are fatal for the call; coercion faults and compliance findings are
    /// recorded on the document instead of failing it.
    pub async fn parse_file(
        &self,
        buffer: &[u8],
        file_type: SourceType,
    ) -> Result<CanonicalDocument> {
        if buffer.is_empty() {
            return Err(InputError::EmptyBuffer.into());
        }
        if buffer.len() > self.max_buffer_bytes {
            return Err(InputError::BufferTooLarge {
                size: buffer.len(),
                limit: self.max_buffer_bytes,
            }
            .into());
        }

        debug!(
            file_type = file_type.as_str(),
            bytes = buffer.len(),
            "ingesting document"
        );

        let raw = match file_type {
            SourceType::Pdf => extract::pdf::extract(buffer, self.ocr.as_deref()).await?,
            SourceType::Xlsx => extract::xlsx::extract(buffer)?,
            SourceType::Csv => extract::csv::extract(buffer)?,
            SourceType::Docx => extract::docx::extract(buffer)?,
        };

        let doc = normalize_document(raw, &self.address_parser, &self.validator)
            .map_err(IngestError::Parse)?;
        Ok(doc)
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience over a default [`Ingestor`] (no OCR fallback).
pub async fn parse_file(buffer: &[u8], file_type: SourceType) -> Result<CanonicalDocument> {
    Ingestor::new().parse_file(buffer, file_type).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_CSV: &str = "\
# Shipper: Acme Exports
# Consignee: Global Imports
# Incoterm: FOB
# Currency: usd
# Reference: PO-12345

partNumber,description,quantity,netWeightKg,valueUsd,htsCode,countryOfOrigin
W123,Widget Assembly,10,125.5 kg,1500 USD,847150,us
G456,Gadget Kit,5,25 kg,USD 750,902710,CN
";

    #[tokio::test]
    async fn test_empty_buffer_rejected() {
        let err = Ingestor::new()
            .parse_file(b"", SourceType::Csv)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Input(InputError::EmptyBuffer)));
    }

    #[tokio::test]
    async fn test_oversized_buffer_rejected() {
        let ingestor = Ingestor::new().with_max_buffer_bytes(8);
        let err = ingestor
            .parse_file(b"0123456789", SourceType::Csv)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Input(InputError::BufferTooLarge { size: 10, limit: 8 })
        ));
    }

    #[tokio::test]
    async fn test_end_to_end_csv_ingestion() {
        let doc = Ingestor::new()
            .parse_file(SAMPLE_CSV.as_bytes(), SourceType::Csv)
            .await
            .unwrap();

        assert_eq!(doc.header.incoterm, "FOB");
        assert_eq!(doc.header.currency, "USD");
        assert_eq!(doc.header.shipper.as_ref().unwrap().name, "Acme Exports");

        assert_eq!(doc.lines.len(), 2);
        assert_eq!(doc.lines[0].part_number, "W123");
        assert_eq!(doc.lines[0].quantity, 10.0);
        assert_eq!(doc.lines[0].country_of_origin, "US");

        assert_eq!(doc.checksums.quantity, 15.0);
        assert_eq!(doc.checksums.net_weight_kg, 150.5);
        assert_eq!(doc.checksums.value_usd, 2250.0);

        assert_eq!(doc.meta.source_type, SourceType::Csv);
        assert!(doc.meta.validation.is_empty());
    }

    #[tokio::test]
    async fn test_aliased_csv_yields_clean_compliance() {
        let csv = "HTS,COO,Quantity,Part,Description,Weight,Value\n\
                   847150,us,5,W123,Widget Assembly,25 kg,750\n";

        let doc = Ingestor::new()
            .parse_file(csv.as_bytes(), SourceType::Csv)
            .await
            .unwrap();

        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].hts_code, "847150");
        assert_eq!(doc.lines[0].country_of_origin, "US");
        assert_eq!(doc.lines[0].quantity, 5.0);
        assert!(
            doc.meta
                .validation
                .iter()
                .all(|i| !i.code.starts_with("HTS_") && !i.code.starts_with("COO_"))
        );
    }
}
