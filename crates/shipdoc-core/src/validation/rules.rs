//! Per-field compliance rules.
//!
//! Each rule returns `None` when the value passes, or a reference to the
//! catalog entry describing the defect. Rules are pure functions over the
//! value and the injected known-code tables; shape defects are errors,
//! well-formed-but-unrecognized values are warnings.

use std::collections::HashSet;

use chrono::{Months, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use super::catalog::{self, CatalogEntry};
use crate::coerce::LB_TO_KG;

lazy_static! {
    static ref HTS_SHAPE: Regex = Regex::new(r"^\d{6,10}$").unwrap();
    static ref COO_SHAPE: Regex = Regex::new(r"^[A-Z]{2}$").unwrap();
}

/// 100,000 lbs expressed in kilograms; weights above this are flagged.
pub const WEIGHT_UNREASONABLE_KG: f64 = 100_000.0 * LB_TO_KG;

/// Per-line values above $10M are flagged.
pub const VALUE_UNREASONABLE_USD: f64 = 10_000_000.0;

/// Validate an HTS code: dots are cosmetic and stripped before checking
/// the 6-10 digit shape and the known 6-digit prefix set.
pub fn validate_hts(code: &str, known_prefixes: &HashSet<String>) -> Option<&'static CatalogEntry> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Some(&catalog::HTS_REQUIRED);
    }

    let clean: String = trimmed.chars().filter(|c| *c != '.').collect();
    if !HTS_SHAPE.is_match(&clean) {
        return Some(&catalog::HTS_INVALID_FORMAT);
    }

    if !known_prefixes.contains(&clean[..6]) {
        return Some(&catalog::HTS_UNKNOWN);
    }

    None
}

/// Validate a country-of-origin code against ISO 3166-1 alpha-2 shape and
/// the known-country set. Case-insensitive.
pub fn validate_coo(code: &str, known_countries: &HashSet<String>) -> Option<&'static CatalogEntry> {
    let clean = code.trim().to_uppercase();
    if clean.is_empty() {
        return Some(&catalog::COO_REQUIRED);
    }

    if !COO_SHAPE.is_match(&clean) {
        return Some(&catalog::COO_INVALID_FORMAT);
    }

    if !known_countries.contains(&clean) {
        return Some(&catalog::COO_UNKNOWN);
    }

    None
}

/// Descriptions must be present and at least 3 characters.
pub fn validate_description(description: &str) -> Option<&'static CatalogEntry> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Some(&catalog::DESCRIPTION_REQUIRED);
    }
    if trimmed.chars().count() < 3 {
        return Some(&catalog::DESCRIPTION_TOO_SHORT);
    }
    None
}

/// Weights must be finite and non-negative; implausibly large values are a
/// warning, not an error.
pub fn validate_weight(weight_kg: f64) -> Option<&'static CatalogEntry> {
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Some(&catalog::WEIGHT_INVALID);
    }
    if weight_kg > WEIGHT_UNREASONABLE_KG {
        return Some(&catalog::WEIGHT_UNREASONABLE);
    }
    None
}

/// Declared values must be finite and non-negative; per-line values above
/// the sanity cap are a warning.
pub fn validate_value(value_usd: f64) -> Option<&'static CatalogEntry> {
    if !value_usd.is_finite() || value_usd < 0.0 {
        return Some(&catalog::VALUE_INVALID);
    }
    if value_usd > VALUE_UNREASONABLE_USD {
        return Some(&catalog::VALUE_UNREASONABLE);
    }
    None
}

/// Validate an optional shipment date. The anchor date is passed in so the
/// rule stays pure; dates more than a year either side of it are flagged.
/// Empty input passes (dates are optional).
pub fn validate_date(date: &str, today: NaiveDate) -> Option<&'static CatalogEntry> {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Some(parsed) = parse_date(trimmed) else {
        return Some(&catalog::DATE_INVALID);
    };

    let one_year_ago = today.checked_sub_months(Months::new(12)).unwrap_or(today);
    let one_year_ahead = today.checked_add_months(Months::new(12)).unwrap_or(today);
    if parsed < one_year_ago || parsed > one_year_ahead {
        return Some(&catalog::DATE_UNREASONABLE);
    }

    None
}

/// Try the date formats that show up in shipment documents.
fn parse_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    None
}
