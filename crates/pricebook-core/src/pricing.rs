//! # Price Calculator
//!
//! Derives the box price (`Precio 1`) from a unit price (`Precio 2`) and a
//! quantity driver.
//!
//! ## Quantity Drivers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Manual mode                        Fraction mode                       │
//! │  ───────────                        ─────────────                       │
//! │  operator types "units per box"     catalog row declares pack_fraction │
//! │            │                                    │                       │
//! │            ▼                                    ▼                       │
//! │  QuantityDriver::Manual(10)         QuantityDriver::Fraction(30)        │
//! │            │                                    │                       │
//! │            └──────────────┬─────────────────────┘                       │
//! │                           ▼                                             │
//! │             total = round(unit × driver, 2)                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unit prices are whole cents (see [`Money::parse_decimal`]) so the product
//! is exact. The two-decimal rounding in force is the round-half-up applied
//! when the price was parsed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_pack_fraction, validate_quantity, validate_unit_price, ValidationResult,
};

// =============================================================================
// Pricing Mode
// =============================================================================

/// Which quantity driver a session prices with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// The operator enters units per box.
    #[default]
    Manual,
    /// Units per box come from the catalog's pack fraction.
    Fraction,
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingMode::Manual => f.write_str("manual"),
            PricingMode::Fraction => f.write_str("fraction"),
        }
    }
}

impl FromStr for PricingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(PricingMode::Manual),
            "fraction" => Ok(PricingMode::Fraction),
            other => Err(ValidationError::InvalidFormat {
                field: "pricing mode".to_string(),
                reason: format!("'{}' is not one of: manual, fraction", other),
            }),
        }
    }
}

// =============================================================================
// Quantity Driver
// =============================================================================

/// The value multiplied by the unit price to get the box price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QuantityDriver {
    /// Operator-entered pack count, at least 1.
    Manual(u32),
    /// Catalog pack fraction of the product.
    Fraction(u32),
}

// =============================================================================
// Calculator
// =============================================================================

/// Manual mode: `round(unit × quantity, 2)`.
///
/// ```rust
/// use pricebook_core::money::Money;
/// use pricebook_core::pricing::total_for_quantity;
///
/// let total = total_for_quantity(Money::from_cents(250), 10).unwrap();
/// assert_eq!(total.to_string(), "25.00");
/// ```
pub fn total_for_quantity(unit_price: Money, quantity: u32) -> ValidationResult<Money> {
    validate_quantity(quantity)?;
    multiply(unit_price, quantity)
}

/// Fraction mode: `round(pack_fraction × unit, 2)`.
///
/// ```rust
/// use pricebook_core::money::Money;
/// use pricebook_core::pricing::total_for_fraction;
///
/// let total = total_for_fraction(Money::from_cents(125), 30).unwrap();
/// assert_eq!(total.to_string(), "37.50");
/// ```
pub fn total_for_fraction(unit_price: Money, pack_fraction: u32) -> ValidationResult<Money> {
    validate_pack_fraction(pack_fraction)?;
    multiply(unit_price, pack_fraction)
}

/// Dispatches on the driver kind.
pub fn total_price(unit_price: Money, driver: QuantityDriver) -> ValidationResult<Money> {
    match driver {
        QuantityDriver::Manual(qty) => total_for_quantity(unit_price, qty),
        QuantityDriver::Fraction(fraction) => total_for_fraction(unit_price, fraction),
    }
}

fn multiply(unit_price: Money, multiplier: u32) -> ValidationResult<Money> {
    validate_unit_price(unit_price)?;
    unit_price
        .checked_multiply_quantity(multiplier)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "total price".to_string(),
            min: 0,
            max: i64::MAX,
        })
}

/// Recovers an approximate pack quantity from stored prices.
///
/// `floor(total / unit)` when `unit != 0`, otherwise `1`.
///
/// ## Known Precision Loss
/// Integer truncation: a total that was not an exact multiple of the unit
/// price comes back rounded down, and a total smaller than the unit price
/// comes back as `0`. The value is a prefill for editing, not a fact.
///
/// ```rust
/// use pricebook_core::money::Money;
/// use pricebook_core::pricing::implied_quantity;
///
/// assert_eq!(implied_quantity(Money::from_cents(2000), Money::from_cents(200)), 10);
/// assert_eq!(implied_quantity(Money::from_cents(2050), Money::from_cents(300)), 6);
/// assert_eq!(implied_quantity(Money::from_cents(500), Money::zero()), 1);
/// ```
pub fn implied_quantity(total_price: Money, unit_price: Money) -> u32 {
    if unit_price.is_zero() {
        return 1;
    }

    let quotient = (total_price.cents() / unit_price.cents()).max(0);
    u32::try_from(quotient).unwrap_or(u32::MAX)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::parse_decimal(s).unwrap()
    }

    #[test]
    fn test_fraction_mode_example() {
        // A FOLIC, 30 per box, 1.25 each
        let total = total_for_fraction(money("1.25"), 30).unwrap();
        assert_eq!(total, money("37.50"));
    }

    #[test]
    fn test_manual_mode() {
        assert_eq!(total_for_quantity(money("2.50"), 10).unwrap(), money("25.00"));
        assert_eq!(total_for_quantity(money("0.99"), 3).unwrap(), money("2.97"));
    }

    #[test]
    fn test_zero_unit_price_gives_zero_total() {
        assert_eq!(total_for_quantity(Money::zero(), 12).unwrap(), Money::zero());
        assert_eq!(total_for_fraction(Money::zero(), 30).unwrap(), Money::zero());
    }

    /// Rounding happens when the unit price is parsed (half up), the
    /// multiplication is exact afterwards.
    #[test]
    fn test_rounding_is_pinned_at_parse() {
        let unit = money("0.125"); // → 0.13
        assert_eq!(total_for_quantity(unit, 3).unwrap(), money("0.39"));
    }

    #[test]
    fn test_invalid_drivers_rejected() {
        assert!(total_for_quantity(money("1.00"), 0).is_err());
        assert!(total_for_fraction(money("1.00"), 0).is_err());
        assert!(total_for_quantity(Money::from_cents(-100), 1).is_err());
    }

    #[test]
    fn test_large_counts_are_priced() {
        assert_eq!(total_for_fraction(money("0.10"), 20_000).unwrap(), money("2000.00"));
        assert_eq!(total_for_quantity(money("0.01"), 20_000).unwrap(), money("200.00"));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert!(total_for_fraction(huge, 3).is_err());
        assert!(total_for_quantity(huge, u32::MAX).is_err());
    }

    #[test]
    fn test_total_price_dispatch() {
        let unit = money("2.00");
        assert_eq!(
            total_price(unit, QuantityDriver::Manual(10)).unwrap(),
            money("20.00")
        );
        assert_eq!(
            total_price(unit, QuantityDriver::Fraction(5)).unwrap(),
            money("10.00")
        );
    }

    #[test]
    fn test_implied_quantity_truncates() {
        assert_eq!(implied_quantity(money("20.00"), money("2.00")), 10);
        // 20.50 / 3.00 = 6.83 → 6 (documented loss)
        assert_eq!(implied_quantity(money("20.50"), money("3.00")), 6);
        // total below unit price → 0
        assert_eq!(implied_quantity(money("1.00"), money("2.00")), 0);
        assert_eq!(implied_quantity(money("9.00"), Money::zero()), 1);
    }

    #[test]
    fn test_pricing_mode_parse() {
        assert_eq!("manual".parse::<PricingMode>().unwrap(), PricingMode::Manual);
        assert_eq!(" Fraction ".parse::<PricingMode>().unwrap(), PricingMode::Fraction);
        assert!("box".parse::<PricingMode>().is_err());
        assert_eq!(PricingMode::default(), PricingMode::Manual);
    }
}
