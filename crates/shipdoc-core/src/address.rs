//! Free-text address parsing.
//!
//! Shipper/consignee blocks arrive as one blob with embedded commas and/or
//! newlines. The parser splits the blob into logical segments and peels
//! structure off from both ends: the entity name from the front, the
//! country and a city/state/zip segment from the back. Whatever cannot be
//! determined stays an empty string; this parser never fails.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Address;

lazy_static! {
    // Short all-caps freight-forwarder code prefixing the entity name.
    static ref FORWARDER_PREFIX: Regex = Regex::new(r"^[A-Z]{2,3}\s+").unwrap();

    // A segment that is nothing but a corporate suffix ("Inc.", "LLC", ...)
    // split off the name by the comma/newline tokenizer.
    static ref CORPORATE_SUFFIX: Regex =
        Regex::new(r"(?i)^(Inc\.?|LLC|Ltd\.?|Pty Ltd\.?)$").unwrap();

    // "Pleasanton CA 94588" / "Bankstown Aerodrome NSW 2198":
    // city text, 2-3 uppercase letters, 4-5 digit postal code.
    static ref CITY_STATE_ZIP: Regex = Regex::new(r"^(.*?)\s+([A-Z]{2,3})\s+(\d{4,5})$").unwrap();
}

/// Country names/aliases recognized when they appear as the final segment.
const KNOWN_COUNTRIES: &[&str] = &[
    "USA",
    "United States",
    "Australia",
    "United Kingdom",
    "GB",
    "UK",
    "Canada",
    "Japan",
    "China",
];

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

const AU_STATES: &[&str] = &["NSW", "VIC", "QLD", "WA", "SA", "TAS", "ACT", "NT"];

/// Subdivision tables used to infer a country from a recognized state code.
#[derive(Debug, Clone)]
pub struct CountryTables {
    pub known_countries: &'static [&'static str],
    /// (subdivision codes, country they imply)
    pub subdivisions: Vec<(&'static [&'static str], &'static str)>,
}

impl Default for CountryTables {
    fn default() -> Self {
        Self {
            known_countries: KNOWN_COUNTRIES,
            subdivisions: vec![(US_STATES, "United States"), (AU_STATES, "Australia")],
        }
    }
}

/// Splits free-text address blobs into structured [`Address`] values.
/// Country tables are injected at construction so deployments (and tests)
/// can swap them without touching the parsing logic.
#[derive(Debug, Clone, Default)]
pub struct AddressParser {
    tables: CountryTables,
}

impl AddressParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: CountryTables) -> Self {
        Self { tables }
    }

    /// Parse one address blob. Returns `None` only for empty input.
    pub fn parse(&self, raw: &str) -> Option<Address> {
        if raw.trim().is_empty() {
            return None;
        }

        let mut parts: Vec<String> = raw
            .split(['\n', ','])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(first) = parts.first_mut() {
            *first = FORWARDER_PREFIX.replace(first, "").to_string();
        }

        // A bare "Inc." / "Ltd." segment belongs to the name.
        if parts.len() > 1 && CORPORATE_SUFFIX.is_match(&parts[1]) {
            let suffix = parts.remove(1);
            parts[0] = format!("{}, {}", parts[0], suffix);
        }

        let mut result = Address::default();
        if !parts.is_empty() {
            result.name = parts.remove(0);
        }

        // Country is usually the last segment.
        if let Some(last) = parts.last() {
            let last_lower = last.to_lowercase();
            if self
                .tables
                .known_countries
                .iter()
                .any(|c| last_lower.contains(&c.to_lowercase()))
            {
                result.country = parts.pop().unwrap_or_default();
            }
        }

        // Scan backward for the first city/state/zip segment.
        for i in (0..parts.len()).rev() {
            if let Some(caps) = CITY_STATE_ZIP.captures(&parts[i]) {
                result.city = caps[1].trim().to_string();
                result.state = caps[2].to_string();
                result.zip = caps[3].to_string();
                parts.remove(i);
                break;
            }
        }

        // Whatever remains are street lines.
        if !parts.is_empty() {
            result.address = parts.remove(0);
            if !parts.is_empty() {
                result.address2 = parts.join(", ");
            }
        }

        // Infer the country from a recognized subdivision code.
        if result.country.is_empty() && !result.state.is_empty() {
            let state = result.state.to_uppercase();
            for (codes, country) in &self.tables.subdivisions {
                if codes.contains(&state.as_str()) {
                    result.country = (*country).to_string();
                    break;
                }
            }
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_us_address_with_forwarder_prefix() {
        let parser = AddressParser::new();
        let address = parser
            .parse("FC Acme Inc.\n123 Main St\nPleasanton CA 94588")
            .unwrap();

        assert_eq!(address.name, "Acme Inc.");
        assert_eq!(address.address, "123 Main St");
        assert_eq!(address.city, "Pleasanton");
        assert_eq!(address.state, "CA");
        assert_eq!(address.zip, "94588");
        assert_eq!(address.country, "United States");
    }

    #[test]
    fn test_corporate_suffix_merged_into_name() {
        let parser = AddressParser::new();
        let address = parser
            .parse("Southern Widgets, Pty Ltd., 12 Hangar Rd, Bankstown Aerodrome NSW 2198, Australia")
            .unwrap();

        assert_eq!(address.name, "Southern Widgets, Pty Ltd.");
        assert_eq!(address.address, "12 Hangar Rd");
        assert_eq!(address.city, "Bankstown Aerodrome");
        assert_eq!(address.state, "NSW");
        assert_eq!(address.zip, "2198");
        assert_eq!(address.country, "Australia");
    }

    #[test]
    fn test_extra_segments_become_address2() {
        let parser = AddressParser::new();
        let address = parser
            .parse("Global Imports, 500 Dock Rd, Building 7, Oakland CA 94607")
            .unwrap();

        assert_eq!(address.address, "500 Dock Rd");
        assert_eq!(address.address2, "Building 7");
        assert_eq!(address.city, "Oakland");
    }

    #[test]
    fn test_degrades_gracefully_on_sparse_input() {
        let parser = AddressParser::new();

        assert_eq!(parser.parse(""), None);
        assert_eq!(parser.parse("   \n "), None);

        let name_only = parser.parse("Acme Exports").unwrap();
        assert_eq!(name_only.name, "Acme Exports");
        assert_eq!(name_only.address, "");
        assert_eq!(name_only.country, "");
    }

    #[test]
    fn test_explicit_country_wins_over_inference() {
        let parser = AddressParser::new();
        let address = parser
            .parse("Acme GmbH\nHauptstrasse 1\nLondon ABC 12345\nUnited Kingdom")
            .unwrap();
        assert_eq!(address.country, "United Kingdom");
    }
}
