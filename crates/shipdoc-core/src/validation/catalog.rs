//! Catalog of compliance issue definitions.
//!
//! One entry per issue code: severity, operator-facing message, and the
//! suggested fix. Rules return references into this catalog; the context
//! (line index, field, offending value) is attached when the issue is
//! materialized.

use crate::models::{Severity, ValidationIssue};

/// A catalog entry: everything about an issue except its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub suggestion: &'static str,
}

impl CatalogEntry {
    /// Materialize this entry as an issue tied to a specific line/field.
    pub fn issue(&self, line_index: Option<usize>, field: &str, value: &str) -> ValidationIssue {
        ValidationIssue {
            code: self.code.to_string(),
            severity: self.severity,
            message: self.message.to_string(),
            suggestion: self.suggestion.to_string(),
            line_index,
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

// HTS codes

pub const HTS_REQUIRED: CatalogEntry = CatalogEntry {
    code: "HTS_REQUIRED",
    severity: Severity::Error,
    message: "HTS code is required",
    suggestion: "Please provide a valid HTS code for this item.",
};

pub const HTS_INVALID_FORMAT: CatalogEntry = CatalogEntry {
    code: "HTS_INVALID_FORMAT",
    severity: Severity::Warning,
    message: "HTS code must be 6 to 10 digits",
    suggestion: "Check the HTS code format.",
};

pub const HTS_UNKNOWN: CatalogEntry = CatalogEntry {
    code: "HTS_UNKNOWN",
    severity: Severity::Warning,
    message: "HTS code not found in standard list",
    suggestion: "Verify the HTS code against the official schedule.",
};

// Country of origin

pub const COO_REQUIRED: CatalogEntry = CatalogEntry {
    code: "COO_REQUIRED",
    severity: Severity::Error,
    message: "Country of Origin is required",
    suggestion: "Please specify the country where this item was manufactured.",
};

pub const COO_INVALID_FORMAT: CatalogEntry = CatalogEntry {
    code: "COO_INVALID_FORMAT",
    severity: Severity::Error,
    message: "Country code must be 2 letters",
    suggestion: "Use a 2-letter ISO code (e.g., US, CN, MX).",
};

pub const COO_UNKNOWN: CatalogEntry = CatalogEntry {
    code: "COO_UNKNOWN",
    severity: Severity::Warning,
    message: "Country code not recognized",
    suggestion: "Verify this is a valid ISO 3166-1 alpha-2 code.",
};

// Weight

pub const WEIGHT_INVALID: CatalogEntry = CatalogEntry {
    code: "WEIGHT_INVALID",
    severity: Severity::Error,
    message: "Weight must be a positive number",
    suggestion: "Enter a valid weight value greater than 0.",
};

pub const WEIGHT_UNREASONABLE: CatalogEntry = CatalogEntry {
    code: "WEIGHT_UNREASONABLE",
    severity: Severity::Warning,
    message: "Weight seems unusually high (> 100,000 lbs)",
    suggestion: "Please verify the weight value is correct.",
};

// Value

pub const VALUE_INVALID: CatalogEntry = CatalogEntry {
    code: "VALUE_INVALID",
    severity: Severity::Error,
    message: "Value must be a positive number",
    suggestion: "Enter a valid monetary value greater than 0.",
};

pub const VALUE_UNREASONABLE: CatalogEntry = CatalogEntry {
    code: "VALUE_UNREASONABLE",
    severity: Severity::Warning,
    message: "Value seems unusually high (> $10M per line)",
    suggestion: "Please verify the value is correct.",
};

// Description

pub const DESCRIPTION_REQUIRED: CatalogEntry = CatalogEntry {
    code: "DESCRIPTION_REQUIRED",
    severity: Severity::Error,
    message: "Description is required",
    suggestion: "Please provide a description of this item.",
};

pub const DESCRIPTION_TOO_SHORT: CatalogEntry = CatalogEntry {
    code: "DESCRIPTION_TOO_SHORT",
    severity: Severity::Warning,
    message: "Description is too short",
    suggestion: "Provide a more detailed description (at least 3 characters).",
};

// Dates

pub const DATE_INVALID: CatalogEntry = CatalogEntry {
    code: "DATE_INVALID",
    severity: Severity::Error,
    message: "Invalid date format",
    suggestion: "Use a valid date format (e.g., YYYY-MM-DD).",
};

pub const DATE_UNREASONABLE: CatalogEntry = CatalogEntry {
    code: "DATE_UNREASONABLE",
    severity: Severity::Warning,
    message: "Date is more than 1 year in the past or future",
    suggestion: "Verify the shipment date is correct.",
};
