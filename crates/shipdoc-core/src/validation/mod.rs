//! Compliance validation over normalized line items.
//!
//! The validator runs the full rule set from scratch on every call (no
//! incremental state) and collects every issue it finds; it never fails a
//! call. Findings are data, attached to the canonical document under
//! `meta.validation` — the pipeline does not block ingestion on them.

pub mod catalog;
pub mod rules;

use std::collections::HashSet;

use crate::models::{LineItem, ValidationIssue};
pub use catalog::CatalogEntry;

/// HTS 6-digit prefixes accepted by default. A real deployment injects the
/// current tariff schedule instead.
const KNOWN_HTS_PREFIXES: &[&str] = &["847150", "902710", "851762"];

/// ISO 3166-1 alpha-2 codes accepted by default.
const VALID_COUNTRIES: &[&str] = &[
    "US", "CN", "MX", "CA", "DE", "JP", "GB", "FR", "IT", "ES", "BR", "IN", "AU", "KR", "TW",
    "SG", "MY", "TH", "VN", "ID",
];

/// Rule-set runner with injected known-code tables. Construct once and
/// share freely; validation is a pure function of the line set.
#[derive(Debug, Clone)]
pub struct ComplianceValidator {
    known_hts_prefixes: HashSet<String>,
    known_countries: HashSet<String>,
}

impl Default for ComplianceValidator {
    fn default() -> Self {
        Self {
            known_hts_prefixes: KNOWN_HTS_PREFIXES.iter().map(|s| s.to_string()).collect(),
            known_countries: VALID_COUNTRIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ComplianceValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accepted HTS prefix table.
    pub fn with_hts_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_hts_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the accepted country-code table.
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate_hts(&self, code: &str) -> Option<&'static CatalogEntry> {
        rules::validate_hts(code, &self.known_hts_prefixes)
    }

    pub fn validate_coo(&self, code: &str) -> Option<&'static CatalogEntry> {
        rules::validate_coo(code, &self.known_countries)
    }

    /// Run every rule against every line, collecting all findings. Multiple
    /// issues on one line are all reported, never short-circuited.
    pub fn validate_compliance(&self, lines: &[LineItem]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            if let Some(entry) = self.validate_hts(&line.hts_code) {
                issues.push(entry.issue(Some(index), "htsCode", &line.hts_code));
            }

            if let Some(entry) = self.validate_coo(&line.country_of_origin) {
                issues.push(entry.issue(Some(index), "countryOfOrigin", &line.country_of_origin));
            }

            if let Some(entry) = rules::validate_description(&line.description) {
                issues.push(entry.issue(Some(index), "description", &line.description));
            }

            if let Some(entry) = rules::validate_weight(line.net_weight_kg) {
                issues.push(entry.issue(
                    Some(index),
                    "netWeightKg",
                    &line.net_weight_kg.to_string(),
                ));
            }

            if let Some(entry) = rules::validate_value(line.value_usd) {
                issues.push(entry.issue(Some(index), "valueUsd", &line.value_usd.to_string()));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn valid_line() -> LineItem {
        LineItem {
            part_number: "W123".to_string(),
            description: "Widget Assembly".to_string(),
            quantity: 10.0,
            net_weight_kg: 125.5,
            value_usd: 1500.0,
            hts_code: "847150".to_string(),
            country_of_origin: "US".to_string(),
            purchase_order_number: String::new(),
        }
    }

    #[test]
    fn test_hts_validation() {
        let validator = ComplianceValidator::new();

        assert_eq!(validator.validate_hts("847150"), None);
        // Dots are stripped before checking
        assert_eq!(validator.validate_hts("8471.50"), None);
        assert_eq!(
            validator.validate_hts("123").map(|e| e.code),
            Some("HTS_INVALID_FORMAT")
        );
        assert_eq!(
            validator.validate_hts("123456").map(|e| e.code),
            Some("HTS_UNKNOWN")
        );
        assert_eq!(
            validator.validate_hts("").map(|e| e.code),
            Some("HTS_REQUIRED")
        );
    }

    #[test]
    fn test_coo_validation() {
        let validator = ComplianceValidator::new();

        assert_eq!(validator.validate_coo("US"), None);
        // Case-insensitive
        assert_eq!(validator.validate_coo("cn"), None);
        assert_eq!(
            validator.validate_coo("USA").map(|e| e.code),
            Some("COO_INVALID_FORMAT")
        );
        assert_eq!(
            validator.validate_coo("XX").map(|e| e.code),
            Some("COO_UNKNOWN")
        );
        assert_eq!(
            validator.validate_coo("").map(|e| e.code),
            Some("COO_REQUIRED")
        );
    }

    #[test]
    fn test_weight_and_value_sanity_rules() {
        assert_eq!(rules::validate_weight(0.0), None);
        assert_eq!(
            rules::validate_weight(-1.0).map(|e| e.code),
            Some("WEIGHT_INVALID")
        );
        assert_eq!(
            rules::validate_weight(50_000.0).map(|e| e.code),
            Some("WEIGHT_UNREASONABLE")
        );

        assert_eq!(rules::validate_value(1500.0), None);
        assert_eq!(
            rules::validate_value(f64::NAN).map(|e| e.code),
            Some("VALUE_INVALID")
        );
        assert_eq!(
            rules::validate_value(20_000_000.0).map(|e| e.code),
            Some("VALUE_UNREASONABLE")
        );
    }

    #[test]
    fn test_description_rules() {
        assert_eq!(rules::validate_description("Widget Assembly"), None);
        assert_eq!(
            rules::validate_description("").map(|e| e.code),
            Some("DESCRIPTION_REQUIRED")
        );
        assert_eq!(
            rules::validate_description("ab").map(|e| e.code),
            Some("DESCRIPTION_TOO_SHORT")
        );
    }

    #[test]
    fn test_date_rules() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

        assert_eq!(rules::validate_date("", today), None);
        assert_eq!(rules::validate_date("2026-05-01", today), None);
        assert_eq!(rules::validate_date("March 5, 2026", today), None);
        assert_eq!(
            rules::validate_date("not a date", today).map(|e| e.code),
            Some("DATE_INVALID")
        );
        assert_eq!(
            rules::validate_date("2020-01-01", today).map(|e| e.code),
            Some("DATE_UNREASONABLE")
        );
    }

    #[test]
    fn test_full_sweep_collects_issues_per_line() {
        let validator = ComplianceValidator::new();

        let mut bad_line = valid_line();
        bad_line.hts_code = "000000".to_string();
        bad_line.country_of_origin = "XX".to_string();

        let issues = validator.validate_compliance(&[valid_line(), bad_line]);
        assert_eq!(issues.len(), 2);

        let hts = issues.iter().find(|i| i.field == "htsCode").unwrap();
        assert_eq!(hts.line_index, Some(1));
        assert_eq!(hts.code, "HTS_UNKNOWN");
        assert_eq!(hts.severity, Severity::Warning);
        assert_eq!(hts.value, "000000");

        let coo = issues.iter().find(|i| i.field == "countryOfOrigin").unwrap();
        assert_eq!(coo.line_index, Some(1));
        assert_eq!(coo.code, "COO_UNKNOWN");
    }

    #[test]
    fn test_injected_tables_replace_defaults() {
        let validator = ComplianceValidator::new()
            .with_hts_prefixes(["111111"])
            .with_countries(["ZZ"]);

        assert_eq!(validator.validate_hts("111111"), None);
        assert_eq!(
            validator.validate_hts("847150").map(|e| e.code),
            Some("HTS_UNKNOWN")
        );
        assert_eq!(validator.validate_coo("zz"), None);
    }
}
