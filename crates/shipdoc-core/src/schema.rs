//! Schema gate: the final structural checkpoint before a document is
//! considered canonical.
//!
//! The type system already guarantees that every field exists with the
//! right primitive type, so the gate enforces the value invariants the
//! types cannot express: a non-empty line set, finite numbers, checksums
//! that match a recompute, and uppercased codes. A failure here means an
//! extractor or the normalizer has a bug — it propagates with the full
//! violation list rather than being silently patched.

use crate::error::ParseError;
use crate::models::{CanonicalDocument, Checksums};

/// Run every structural check, returning all violations found.
pub fn check(doc: &CanonicalDocument) -> Vec<String> {
    let mut violations = Vec::new();

    if doc.lines.is_empty() {
        violations.push("lines must contain at least one item".to_string());
    }

    for (index, line) in doc.lines.iter().enumerate() {
        if !line.quantity.is_finite() {
            violations.push(format!("lines[{index}].quantity is not a finite number"));
        }
        if !line.net_weight_kg.is_finite() {
            violations.push(format!("lines[{index}].netWeightKg is not a finite number"));
        }
        if !line.value_usd.is_finite() {
            violations.push(format!("lines[{index}].valueUsd is not a finite number"));
        }
        if line.hts_code != line.hts_code.to_uppercase() {
            violations.push(format!("lines[{index}].htsCode is not uppercased"));
        }
        if line.country_of_origin != line.country_of_origin.to_uppercase() {
            violations.push(format!("lines[{index}].countryOfOrigin is not uppercased"));
        }
        if line.part_number != line.part_number.to_uppercase() {
            violations.push(format!("lines[{index}].partNumber is not uppercased"));
        }
    }

    if doc.header.incoterm != doc.header.incoterm.to_uppercase() {
        violations.push("header.incoterm is not uppercased".to_string());
    }
    if doc.header.currency != doc.header.currency.to_uppercase() {
        violations.push("header.currency is not uppercased".to_string());
    }

    let recomputed = Checksums::compute(&doc.lines);
    if doc.checksums != recomputed {
        violations.push(format!(
            "checksums {:?} do not match recomputed sums {:?}",
            doc.checksums, recomputed
        ));
    }

    violations
}

/// Enforce the canonical invariants, failing with the violation list.
pub fn enforce(doc: &CanonicalDocument) -> Result<(), ParseError> {
    let violations = check(doc);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ParseError::SchemaViolations { violations })
    }
}
