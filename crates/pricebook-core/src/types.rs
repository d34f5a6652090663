//! # Domain Types
//!
//! Core domain types used throughout Pricebook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐            ┌──────────────────────┐          │
//! │  │    CatalogEntry      │            │    LedgerRecord      │          │
//! │  │  ──────────────────  │   borrow   │  ──────────────────  │          │
//! │  │  product_code ───────┼───────────►│  product_code (key)  │          │
//! │  │  name                │  fraction  │  facility_code       │          │
//! │  │  pack_fraction ──────┼───────────►│  total_price         │          │
//! │  │  extra_attributes    │            │  unit_price          │          │
//! │  └──────────────────────┘            └──────────────────────┘          │
//! │      read-only                           mutable, one per code         │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductCode    │   │  FacilityCode   │   │   Attribute     │       │
//! │  │  u64, numeric   │   │  7 digits,      │   │  passthrough    │       │
//! │  │  comparison     │   │  zero-padded    │   │  column/value   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Codes arrive as text or as spreadsheet numbers. They are normalized once,
//! on ingestion, by the functions in [`crate::validation`]; after that every
//! comparison is on the typed value.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{normalize_facility_code, normalize_product_code};
use crate::DEFAULT_FACILITY_CODE;

// =============================================================================
// Product Code
// =============================================================================

/// Numeric product identifier, the key of both the catalog and the ledger.
///
/// Rendered as plain digits (`Display`), never in exponent notation, so long
/// codes survive the trip through a spreadsheet as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductCode(u64);

impl ProductCode {
    /// Creates a product code from its numeric value.
    #[inline]
    pub const fn new(value: u64) -> Self {
        ProductCode(value)
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Coerces a cell to a product code.
    ///
    /// ```rust
    /// use pricebook_core::ProductCode;
    ///
    /// assert_eq!(ProductCode::parse(" 54520 ").unwrap().value(), 54520);
    /// assert_eq!(ProductCode::parse("54520.0").unwrap().value(), 54520);
    /// assert!(ProductCode::parse("A-12").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        normalize_product_code(input)
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCode::parse(s)
    }
}

// =============================================================================
// Facility Code
// =============================================================================

/// Establishment identifier: exactly seven ASCII digits.
///
/// Only constructible through normalization, so a `FacilityCode` value is
/// always well formed. Deserializing goes through the same normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
pub struct FacilityCode(String);

impl FacilityCode {
    /// Normalizes a cell to a facility code (`"21870"` → `"0021870"`).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        normalize_facility_code(input)
    }

    /// Wraps an already padded, digits-only string.
    pub(crate) fn from_padded(padded: String) -> Self {
        FacilityCode(padded)
    }

    /// Returns the padded code.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The deployment default, [`DEFAULT_FACILITY_CODE`].
impl Default for FacilityCode {
    fn default() -> Self {
        FacilityCode(DEFAULT_FACILITY_CODE.to_string())
    }
}

impl fmt::Display for FacilityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FacilityCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacilityCode::parse(s)
    }
}

impl<'de> Deserialize<'de> for FacilityCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FacilityCode::parse(&raw).map_err(de::Error::custom)
    }
}

// =============================================================================
// Passthrough Attribute
// =============================================================================

/// A column the engine carries but never interprets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Attribute {
    pub column: String,
    pub value: String,
}

impl Attribute {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Looks up a passthrough value by column name.
fn find_attribute<'a>(attributes: &'a [Attribute], column: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.column == column)
        .map(|a| a.value.as_str())
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// A reference product from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogEntry {
    /// Unique within the catalog.
    pub product_code: ProductCode,

    /// Display name.
    pub name: String,

    /// Units per box, when the catalog declares it.
    pub pack_fraction: Option<u32>,

    /// Remaining catalog columns, in file order.
    pub extra_attributes: Vec<Attribute>,
}

impl CatalogEntry {
    /// Creates an entry without passthrough columns.
    pub fn new(product_code: ProductCode, name: impl Into<String>, pack_fraction: Option<u32>) -> Self {
        CatalogEntry {
            product_code,
            name: name.into(),
            pack_fraction,
            extra_attributes: Vec::new(),
        }
    }

    /// Returns a passthrough value by column name.
    pub fn attribute(&self, column: &str) -> Option<&str> {
        find_attribute(&self.extra_attributes, column)
    }

    /// Every column value joined by a single space, for all-columns search.
    pub fn row_text(&self) -> String {
        let mut parts = vec![self.product_code.to_string(), self.name.clone()];
        if let Some(fraction) = self.pack_fraction {
            parts.push(fraction.to_string());
        }
        parts.extend(self.extra_attributes.iter().map(|a| a.value.clone()));
        parts.join(" ")
    }
}

// =============================================================================
// Ledger Record
// =============================================================================

/// One priced product in the ledger.
///
/// Field order mirrors the export columns: `CodEstab`, `CodProd`,
/// `Precio 1`, `Precio 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerRecord {
    /// `CodEstab`. Immutable once the record exists.
    pub facility_code: FacilityCode,

    /// `CodProd`. The ledger key, immutable.
    pub product_code: ProductCode,

    /// `Precio 1`: unit price × quantity driver.
    pub total_price: Money,

    /// `Precio 2`: price of one unit.
    pub unit_price: Money,

    /// Passthrough columns from the loaded ledger file. Empty for inserts.
    pub extra: Vec<Attribute>,
}

impl LedgerRecord {
    /// Returns a passthrough value by column name.
    pub fn attribute(&self, column: &str) -> Option<&str> {
        find_attribute(&self.extra, column)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_code_display_has_no_exponent() {
        let code = ProductCode::new(7_750_182_000_123);
        assert_eq!(code.to_string(), "7750182000123");
    }

    #[test]
    fn test_product_code_ordering_is_numeric() {
        assert!(ProductCode::new(9) < ProductCode::new(10));
        assert_eq!("0100".parse::<ProductCode>().unwrap(), ProductCode::new(100));
    }

    #[test]
    fn test_facility_code_default() {
        assert_eq!(FacilityCode::default().as_str(), "0021870");
    }

    #[test]
    fn test_row_text_joins_all_columns() {
        let mut entry = CatalogEntry::new(ProductCode::new(54520), "A FOLIC", Some(30));
        entry.extra_attributes.push(Attribute::new("Laboratorio", "ACME"));

        assert_eq!(entry.row_text(), "54520 A FOLIC 30 ACME");
        assert_eq!(entry.attribute("Laboratorio"), Some("ACME"));
        assert_eq!(entry.attribute("Missing"), None);
    }

    #[test]
    fn test_ledger_record_serializes_typed_fields() {
        let record = LedgerRecord {
            facility_code: FacilityCode::default(),
            product_code: ProductCode::new(100),
            total_price: Money::from_cents(2000),
            unit_price: Money::from_cents(200),
            extra: Vec::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["facility_code"], "0021870");
        assert_eq!(json["product_code"], 100);
        assert_eq!(json["total_price"], 2000);
    }

    #[test]
    fn test_facility_code_deserialize_normalizes() {
        let code: FacilityCode = serde_json::from_str("\"55\"").unwrap();
        assert_eq!(code.as_str(), "0000055");

        assert!(serde_json::from_str::<FacilityCode>("\"123456789\"").is_err());
        assert!(serde_json::from_str::<FacilityCode>("\"12a\"").is_err());
    }

    #[test]
    fn test_ledger_record_rejects_malformed_facility() {
        let json = r#"{"facility_code":"123456789","product_code":100,"total_price":2000,"unit_price":200,"extra":[]}"#;
        assert!(serde_json::from_str::<LedgerRecord>(json).is_err());
    }
}
