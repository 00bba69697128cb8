//! Normalization: raw extractor output into the canonical document.
//!
//! A deterministic, pure transformation: the same raw document always
//! yields byte-identical canonical output. Coercion failures never abort
//! the call — they default to `0`/`""` and leave a note under
//! `meta.normalization`.

use std::collections::BTreeMap;

use crate::address::AddressParser;
use crate::coerce::{Coerced, normalize_string, to_uppercase};
use crate::error::ParseError;
use crate::models::{CanonicalDocument, Checksums, Header, LineItem, Meta, RawDocument};
use crate::schema;
use crate::validation::ComplianceValidator;

/// Transform a raw document into canonical form, running compliance
/// validation and the schema gate on the way out.
pub fn normalize_document(
    raw: RawDocument,
    address_parser: &AddressParser,
    validator: &ComplianceValidator,
) -> Result<CanonicalDocument, ParseError> {
    let mut notes: BTreeMap<String, String> = BTreeMap::new();

    let header = Header {
        shipper: address_parser.parse(&raw.header.shipper),
        consignee: address_parser.parse(&raw.header.consignee),
        incoterm: to_uppercase(&raw.header.incoterm),
        currency: to_uppercase(&raw.header.currency),
        reference: raw
            .header
            .reference
            .as_deref()
            .map(normalize_string)
            .filter(|r| !r.is_empty()),
    };

    if !header.currency.is_empty() && header.currency.len() != 3 {
        notes.insert(
            "currency".to_string(),
            format!("Currency normalized to ISO-like format: {}", header.currency),
        );
    }

    let mut lines = Vec::with_capacity(raw.lines.len());
    for (index, line) in raw.lines.iter().enumerate() {
        let quantity = Coerced::from_loose(&line.quantity);
        let net_weight = Coerced::from_weight(&line.net_weight);
        let value = Coerced::from_loose(&line.value);

        if quantity.note().is_some() || net_weight.note().is_some() || value.note().is_some() {
            notes.insert(
                format!("line-{index}"),
                "One or more numeric fields could not be parsed and were defaulted to 0."
                    .to_string(),
            );
        }

        lines.push(LineItem {
            part_number: to_uppercase(&line.part_number),
            description: normalize_string(&line.description),
            quantity: quantity.value(),
            net_weight_kg: net_weight.value(),
            value_usd: value.value(),
            hts_code: to_uppercase(&line.hts_code),
            country_of_origin: to_uppercase(&line.country_of_origin),
            purchase_order_number: normalize_string(&line.purchase_order_number),
        });
    }

    let checksums = Checksums::compute(&lines);
    let validation = validator.validate_compliance(&lines);

    let doc = CanonicalDocument {
        header,
        lines,
        checksums,
        meta: Meta {
            source_type: raw.source_type,
            raw: raw.raw,
            normalization: notes,
            validation,
        },
    };

    schema::enforce(&doc)?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawHeader, RawLine, SourceType};
    use pretty_assertions::assert_eq;

    fn raw_document() -> RawDocument {
        RawDocument {
            header: RawHeader {
                shipper: "Acme Exports\n1 Factory Way\nFremont CA 94538".to_string(),
                consignee: "Global Imports".to_string(),
                incoterm: "fob".to_string(),
                currency: "usd".to_string(),
                reference: Some(" PO-12345 ".to_string()),
            },
            lines: vec![
                RawLine {
                    part_number: "w123".to_string(),
                    description: "Widget Assembly".to_string(),
                    quantity: "10".to_string(),
                    net_weight: "125.5 kg".to_string(),
                    value: "1,500.00 USD".to_string(),
                    hts_code: "847150".to_string(),
                    country_of_origin: "us".to_string(),
                    purchase_order_number: String::new(),
                },
                RawLine {
                    part_number: "G456".to_string(),
                    description: "Gadget Kit".to_string(),
                    quantity: "5".to_string(),
                    net_weight: "10 lb".to_string(),
                    value: "750".to_string(),
                    hts_code: "9027.10".to_string(),
                    country_of_origin: "CN".to_string(),
                    purchase_order_number: String::new(),
                },
            ],
            source_type: SourceType::Csv,
            raw: serde_json::json!({}),
        }
    }

    #[test]
    fn test_normalization_uppercases_and_coerces() {
        let doc = normalize_document(
            raw_document(),
            &AddressParser::new(),
            &ComplianceValidator::new(),
        )
        .unwrap();

        assert_eq!(doc.header.incoterm, "FOB");
        assert_eq!(doc.header.currency, "USD");
        assert_eq!(doc.header.reference.as_deref(), Some("PO-12345"));

        let shipper = doc.header.shipper.as_ref().unwrap();
        assert_eq!(shipper.name, "Acme Exports");
        assert_eq!(shipper.city, "Fremont");
        assert_eq!(shipper.country, "United States");

        assert_eq!(doc.lines[0].part_number, "W123");
        assert_eq!(doc.lines[0].quantity, 10.0);
        assert_eq!(doc.lines[0].net_weight_kg, 125.5);
        assert_eq!(doc.lines[0].value_usd, 1500.0);
        assert_eq!(doc.lines[0].country_of_origin, "US");

        assert_eq!(doc.lines[1].net_weight_kg, 10.0 * crate::coerce::LB_TO_KG);
        assert_eq!(doc.lines[1].hts_code, "9027.10");

        assert_eq!(doc.checksums, Checksums::compute(&doc.lines));
        assert!(doc.meta.normalization.is_empty());
    }

    #[test]
    fn test_coercion_failures_default_and_leave_notes() {
        let mut raw = raw_document();
        raw.lines[0].quantity = "n/a".to_string();

        let doc = normalize_document(
            raw,
            &AddressParser::new(),
            &ComplianceValidator::new(),
        )
        .unwrap();

        assert_eq!(doc.lines[0].quantity, 0.0);
        assert!(doc.meta.normalization.contains_key("line-0"));
        // Checksums reflect the defaulted value
        assert_eq!(doc.checksums.quantity, 5.0);
    }

    #[test]
    fn test_odd_currency_is_accepted_with_a_note() {
        let mut raw = raw_document();
        raw.header.currency = "Dollars".to_string();

        let doc = normalize_document(
            raw,
            &AddressParser::new(),
            &ComplianceValidator::new(),
        )
        .unwrap();

        assert_eq!(doc.header.currency, "DOLLARS");
        assert!(doc.meta.normalization.contains_key("currency"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let parser = AddressParser::new();
        let validator = ComplianceValidator::new();

        let first = normalize_document(raw_document(), &parser, &validator).unwrap();
        let second = normalize_document(raw_document(), &parser, &validator).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_lines_fail_the_schema_gate() {
        let mut raw = raw_document();
        raw.lines.clear();

        let err = normalize_document(
            raw,
            &AddressParser::new(),
            &ComplianceValidator::new(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_VIOLATION");
        assert!(err.details().is_some());
    }

    #[test]
    fn test_validation_issues_attach_without_blocking() {
        let mut raw = raw_document();
        raw.lines[1].hts_code = "000000".to_string();
        raw.lines[1].country_of_origin = "XX".to_string();

        let doc = normalize_document(
            raw,
            &AddressParser::new(),
            &ComplianceValidator::new(),
        )
        .unwrap();

        assert_eq!(doc.meta.validation.len(), 2);
        assert!(doc.meta.validation.iter().all(|i| i.line_index == Some(1)));
    }
}
