//! Format-specific extractors.
//!
//! Each extractor reads a raw byte buffer and produces a [`RawDocument`]:
//! header fields and line items still in source form, plus provenance.
//! Layout heuristics live entirely inside the extractor for that format;
//! everything downstream of here is format-agnostic.

pub mod csv;
pub mod docx;
pub mod pdf;
pub mod xlsx;

use crate::models::{RawHeader, RawLine};

/// Header keys accepted by the tabular formats (two-column header sheets,
/// `#` metadata lines, `key: value` paragraphs).
pub(crate) fn apply_header_field(header: &mut RawHeader, key: &str, value: &str) -> bool {
    match key.trim().to_lowercase().as_str() {
        "shipper" => header.shipper = value.trim().to_string(),
        "consignee" => header.consignee = value.trim().to_string(),
        "incoterm" => header.incoterm = value.trim().to_string(),
        "currency" => header.currency = value.trim().to_string(),
        "reference" => header.reference = Some(value.trim().to_string()),
        _ => return false,
    }
    true
}

/// Resolved column positions for a line-item table.
///
/// Spreadsheet and CSV uploads name their columns freely (`HTS` vs
/// `htsCode`, `Qty` vs `Quantity`). The alias table below is resolved once
/// per file into column indexes, so the row loop never does string
/// matching.
#[derive(Debug, Clone, Default)]
pub(crate) struct LineColumns {
    part_number: Option<usize>,
    description: Option<usize>,
    quantity: Option<usize>,
    net_weight: Option<usize>,
    value: Option<usize>,
    hts_code: Option<usize>,
    country_of_origin: Option<usize>,
    purchase_order_number: Option<usize>,
}

impl LineColumns {
    /// Match headers case-insensitively against the accepted aliases.
    pub(crate) fn resolve(headers: &[String]) -> Self {
        let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |aliases: &[&str]| -> Option<usize> {
            lower
                .iter()
                .position(|header| aliases.contains(&header.as_str()))
        };

        Self {
            part_number: find(&["partnumber", "part", "sku"]),
            description: find(&["description", "desc"]),
            quantity: find(&["quantity", "qty"]),
            net_weight: find(&["netweightkg", "netweight", "weight"]),
            value: find(&["valueusd", "value"]),
            hts_code: find(&["htscode", "hts"]),
            country_of_origin: find(&["countryoforigin", "coo", "origin"]),
            purchase_order_number: find(&["purchaseordernumber", "ponumber", "po"]),
        }
    }

    /// True when none of the canonical columns could be located — the
    /// header row is not a line-item header at all.
    pub(crate) fn is_empty(&self) -> bool {
        [
            self.part_number,
            self.description,
            self.quantity,
            self.net_weight,
            self.value,
            self.hts_code,
            self.country_of_origin,
            self.purchase_order_number,
        ]
        .iter()
        .all(Option::is_none)
    }

    /// Build a raw line from one table row, leaving unmapped fields empty.
    pub(crate) fn raw_line(&self, row: &[String]) -> RawLine {
        let cell = |index: Option<usize>| -> String {
            index
                .and_then(|i| row.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        RawLine {
            part_number: cell(self.part_number),
            description: cell(self.description),
            quantity: cell(self.quantity),
            net_weight: cell(self.net_weight),
            value: cell(self.value),
            hts_code: cell(self.hts_code),
            country_of_origin: cell(self.country_of_origin),
            purchase_order_number: cell(self.purchase_order_number),
        }
    }
}
