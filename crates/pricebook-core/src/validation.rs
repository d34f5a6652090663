//! # Validation Module
//!
//! Input validation and ingestion normalization for Pricebook.
//!
//! ## Where Values Get Checked
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Ingestion (pricebook-io)                                     │
//! │  ├── normalize_product_code / normalize_facility_code                  │
//! │  ├── normalize_pack_fraction / parse_unit_price                        │
//! │  └── Malformed rows are reported and skipped, the load continues       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Operator input (apps/cli)                                    │
//! │  ├── validate_search_query                                             │
//! │  └── parse_unit_price, validate_quantity                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger (THIS CRATE)                                          │
//! │  ├── product code uniqueness                                           │
//! │  └── price derivation re-validates its inputs                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricebook_core::validation::{normalize_facility_code, validate_quantity};
//!
//! assert_eq!(normalize_facility_code("21870").unwrap().as_str(), "0021870");
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{FacilityCode, ProductCode};
use crate::{FACILITY_CODE_WIDTH, MAX_QUERY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Ingestion Normalizers
// =============================================================================

/// Parses a whole number written as digits or as a spreadsheet float.
///
/// ## Accepted Shapes
/// - `"54520"`, `" 54520 "`, `"0054520"`
/// - `"54520.0"`, `"54520.000"` (a whole number exported by a spreadsheet)
///
/// Signs, exponents, separators and non-zero fractions are rejected.
pub fn parse_whole_number(field: &str, input: &str) -> ValidationResult<u64> {
    let raw = input.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::malformed(field, raw, "not a whole number"));
    }
    if !fraction.bytes().all(|b| b == b'0') {
        return Err(ValidationError::malformed(field, raw, "not a whole number"));
    }

    whole
        .parse::<u64>()
        .map_err(|_| ValidationError::malformed(field, raw, "number is too large"))
}

/// Coerces a product code cell.
pub fn normalize_product_code(input: &str) -> ValidationResult<ProductCode> {
    parse_whole_number("CodProd", input).map(ProductCode::new)
}

/// Normalizes a facility code cell to seven zero-padded digits.
///
/// ## Rules
/// - Digits only (a trailing `.0` from a numeric cell is accepted)
/// - At most seven digits; shorter values are padded on the left
///
/// ```rust
/// use pricebook_core::validation::normalize_facility_code;
///
/// assert_eq!(normalize_facility_code("21870.0").unwrap().as_str(), "0021870");
/// assert!(normalize_facility_code("12345678").is_err());
/// ```
pub fn normalize_facility_code(input: &str) -> ValidationResult<FacilityCode> {
    let raw = input.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "CodEstab".to_string(),
        });
    }

    let (digits, fraction) = raw.split_once('.').unwrap_or((raw, ""));

    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b == b'0')
    {
        return Err(ValidationError::malformed(
            "CodEstab",
            raw,
            "expected digits only",
        ));
    }

    if digits.len() > FACILITY_CODE_WIDTH {
        return Err(ValidationError::malformed(
            "CodEstab",
            raw,
            format!("wider than {} digits", FACILITY_CODE_WIDTH),
        ));
    }

    Ok(FacilityCode::from_padded(format!(
        "{:0>width$}",
        digits,
        width = FACILITY_CODE_WIDTH
    )))
}

/// Coerces an optional pack fraction cell.
///
/// Empty cells mean "no fraction" (`Ok(None)`); anything else must be a
/// positive whole number.
pub fn normalize_pack_fraction(input: &str) -> ValidationResult<Option<u32>> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    let value = parse_whole_number("pack fraction", input)?;
    let fraction = u32::try_from(value).map_err(|_| {
        ValidationError::malformed("pack fraction", input.trim(), "number is too large")
    })?;
    validate_pack_fraction(fraction)?;

    Ok(Some(fraction))
}

/// Parses a unit price and checks it is not negative.
pub fn parse_unit_price(input: &str) -> ValidationResult<Money> {
    let price = Money::parse_decimal(input)?;
    validate_unit_price(price)?;
    Ok(price)
}

// =============================================================================
// Operator Input Validators
// =============================================================================

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns the whole catalog)
/// - Maximum [`MAX_QUERY_LEN`] characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a manual pack quantity.
///
/// Only zero is rejected. Totals too large for [`Money`] are caught when the
/// price is multiplied.
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog pack fraction (units per box).
pub fn validate_pack_fraction(fraction: u32) -> ValidationResult<()> {
    if fraction == 0 {
        return Err(ValidationError::MustBePositive {
            field: "pack fraction".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed and yields a zero total
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_number() {
        assert_eq!(parse_whole_number("n", "54520").unwrap(), 54520);
        assert_eq!(parse_whole_number("n", " 0054520 ").unwrap(), 54520);
        assert_eq!(parse_whole_number("n", "54520.0").unwrap(), 54520);
        assert_eq!(parse_whole_number("n", "54520.000").unwrap(), 54520);

        assert!(matches!(
            parse_whole_number("n", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(parse_whole_number("n", "54520.5").is_err());
        assert!(parse_whole_number("n", "-3").is_err());
        assert!(parse_whole_number("n", "5.45E4").is_err());
        assert!(parse_whole_number("n", "12 34").is_err());
        assert!(parse_whole_number("n", ".0").is_err());
        assert!(parse_whole_number("n", "99999999999999999999999").is_err());
    }

    #[test]
    fn test_normalize_product_code() {
        assert_eq!(normalize_product_code("100").unwrap(), ProductCode::new(100));
        assert!(matches!(
            normalize_product_code("ABC"),
            Err(ValidationError::Malformed { .. })
        ));
    }

    #[test]
    fn test_normalize_facility_code() {
        assert_eq!(normalize_facility_code("21870").unwrap().as_str(), "0021870");
        assert_eq!(normalize_facility_code("0021870").unwrap().as_str(), "0021870");
        assert_eq!(normalize_facility_code("21870.0").unwrap().as_str(), "0021870");
        assert_eq!(normalize_facility_code("7").unwrap().as_str(), "0000007");
        assert_eq!(normalize_facility_code("1234567").unwrap().as_str(), "1234567");

        assert!(normalize_facility_code("").is_err());
        assert!(normalize_facility_code("12345678").is_err());
        assert!(normalize_facility_code("21A70").is_err());
        assert!(normalize_facility_code("21870.5").is_err());
    }

    #[test]
    fn test_normalize_pack_fraction() {
        assert_eq!(normalize_pack_fraction("30").unwrap(), Some(30));
        assert_eq!(normalize_pack_fraction("30.0").unwrap(), Some(30));
        assert_eq!(normalize_pack_fraction("").unwrap(), None);
        assert_eq!(normalize_pack_fraction("   ").unwrap(), None);

        assert!(normalize_pack_fraction("0").is_err());
        assert!(normalize_pack_fraction("2.5").is_err());
        assert!(normalize_pack_fraction("99999999999").is_err());
    }

    #[test]
    fn test_parse_unit_price() {
        assert_eq!(parse_unit_price("1.25").unwrap().cents(), 125);
        assert_eq!(parse_unit_price("0").unwrap(), Money::zero());
        assert!(parse_unit_price("-1.00").is_err());
        assert!(parse_unit_price("free").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  folic ").unwrap(), "folic");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(u32::MAX).is_ok());

        assert!(validate_quantity(0).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::zero()).is_ok());
        assert!(validate_unit_price(Money::from_cents(1099)).is_ok());
        assert!(validate_unit_price(Money::from_cents(-1)).is_err());
    }
}
