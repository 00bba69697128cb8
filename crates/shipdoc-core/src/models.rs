//! Shipment document data models.
//!
//! Two shapes flow through the pipeline: the transient [`RawDocument`] an
//! extractor produces (everything still a string, exactly as found in the
//! source), and the [`CanonicalDocument`] the normalizer hands to callers.
//! Canonical types serialize in camelCase so the JSON matches the shape the
//! rest of the system persists and displays.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source file format of an ingested document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Pdf,
    Xlsx,
    Csv,
    Docx,
}

impl SourceType {
    /// Map a file extension (without the dot) to a source type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Docx => "docx",
        }
    }
}

/// Unparsed header fields as found in the source document. The shipper and
/// consignee are single free-text blobs; the address parser splits them
/// during normalization.
#[derive(Debug, Clone, Default)]
pub struct RawHeader {
    pub shipper: String,
    pub consignee: String,
    pub incoterm: String,
    pub currency: String,
    pub reference: Option<String>,
}

/// One unparsed line item. Numeric fields stay strings here ("125.5 kg",
/// "$1,500") and are coerced during normalization.
#[derive(Debug, Clone, Default)]
pub struct RawLine {
    pub part_number: String,
    pub description: String,
    pub quantity: String,
    pub net_weight: String,
    pub value: String,
    pub hts_code: String,
    pub country_of_origin: String,
    pub purchase_order_number: String,
}

/// Extractor output: lives only for the duration of one ingestion call and
/// is never persisted.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub header: RawHeader,
    pub lines: Vec<RawLine>,
    pub source_type: SourceType,
    /// Format-specific provenance (page count, sheet names, ...).
    pub raw: serde_json::Value,
}

/// A structured postal address. Fields are empty strings when unknown,
/// never absent; the address as a whole may be absent on the header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub address: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// Canonical document header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub shipper: Option<Address>,
    pub consignee: Option<Address>,
    pub incoterm: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// One normalized line item. Every field is populated: coercion failures
/// default to `0`/`""` and are recorded under `meta.normalization`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub part_number: String,
    pub description: String,
    pub quantity: f64,
    pub net_weight_kg: f64,
    pub value_usd: f64,
    pub hts_code: String,
    pub country_of_origin: String,
    pub purchase_order_number: String,
}

/// Derived aggregate sums over the line items, used for consistency
/// cross-checks downstream. Always recomputable; the schema gate rejects a
/// document whose stored checksums differ from a recompute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checksums {
    pub quantity: f64,
    pub net_weight_kg: f64,
    pub value_usd: f64,
}

impl Checksums {
    /// Sum the three numeric fields across the given lines.
    pub fn compute(lines: &[LineItem]) -> Self {
        Self {
            quantity: lines.iter().map(|l| l.quantity).sum(),
            net_weight_kg: lines.iter().map(|l| l.net_weight_kg).sum(),
            value_usd: lines.iter().map(|l| l.value_usd).sum(),
        }
    }
}

/// Severity of a compliance issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single compliance finding. Produced fresh on every validation run;
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_index: Option<usize>,
    pub field: String,
    pub value: String,
}

/// Canonical document metadata: provenance plus the record of every
/// best-effort default and compliance finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub source_type: SourceType,
    /// Format-specific provenance carried over from the extractor.
    pub raw: serde_json::Value,
    /// Field -> note describing any coercion fallback that was applied.
    pub normalization: BTreeMap<String, String>,
    pub validation: Vec<ValidationIssue>,
}

/// The single normalized, validated shipment-document shape all downstream
/// code consumes. Produced once per ingestion call; re-ingesting a changed
/// source yields an entirely new document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDocument {
    pub header: Header,
    pub lines: Vec<LineItem>,
    pub checksums: Checksums,
    pub meta: Meta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_type_from_extension() {
        assert_eq!(SourceType::from_extension("pdf"), Some(SourceType::Pdf));
        assert_eq!(SourceType::from_extension("XLSX"), Some(SourceType::Xlsx));
        assert_eq!(SourceType::from_extension("docx"), Some(SourceType::Docx));
        assert_eq!(SourceType::from_extension("txt"), None);
    }

    #[test]
    fn test_checksums_are_order_independent() {
        let a = LineItem {
            quantity: 10.0,
            net_weight_kg: 125.5,
            value_usd: 1500.0,
            ..Default::default()
        };
        let b = LineItem {
            quantity: 5.0,
            net_weight_kg: 25.0,
            value_usd: 750.0,
            ..Default::default()
        };

        let forward = Checksums::compute(&[a.clone(), b.clone()]);
        let reversed = Checksums::compute(&[b, a]);

        assert_eq!(forward.quantity, 15.0);
        assert_eq!(forward.net_weight_kg, 150.5);
        assert_eq!(forward.value_usd, 2250.0);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_canonical_json_is_camel_case() {
        let line = LineItem {
            part_number: "W123".to_string(),
            net_weight_kg: 1.5,
            ..Default::default()
        };
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("partNumber").is_some());
        assert!(json.get("netWeightKg").is_some());
        assert!(json.get("part_number").is_none());
    }
}
