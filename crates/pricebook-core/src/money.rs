//! # Money Module
//!
//! Provides the `Money` type for prices in the ledger.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Spreadsheet cells are f64:                                             │
//! │    1.1 × 3 = 3.3000000000000003  ❌ WRONG!                              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "1.10" ──► 110 cents ──► × 3 = 330 cents ──► "3.30"                 │
//! │                                                                         │
//! │  Decimal text is rounded to cents ONCE, at ingestion (round half up),  │
//! │  every later product is exact.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricebook_core::money::Money;
//!
//! let unit = Money::parse_decimal("1.25").unwrap();
//! assert_eq!(unit.cents(), 125);
//!
//! let box_price = unit.checked_multiply_quantity(30).unwrap();
//! assert_eq!(box_price.to_string(), "37.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Operator price input ──► LedgerRecord.unit_price   (Precio 2)          │
/// │                                   │                                     │
/// │                                   ▼  × quantity driver                  │
/// │                           LedgerRecord.total_price  (Precio 1)          │
/// │                                   │                                     │
/// │                                   ▼                                     │
/// │                  xlsx "0.00" cell / csv "37.50" field                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount such as `"1.25"`, `"37.5"` or `"2"`.
    ///
    /// ## Rounding
    /// Amounts with more than two decimals are rounded **half up** on the
    /// third decimal: `"1.255"` becomes 126 cents, `"1.2549"` becomes 125.
    /// Exponent notation and thousands separators are rejected.
    ///
    /// ```rust
    /// use pricebook_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("1.255").unwrap().cents(), 126);
    /// assert_eq!(Money::parse_decimal(".5").unwrap().cents(), 50);
    /// assert!(Money::parse_decimal("1,25").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Money, ValidationError> {
        let raw = input.trim();
        let malformed = |reason: &str| ValidationError::malformed("price", input.trim(), reason);

        let (negative, unsigned) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(malformed("expected a decimal amount"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed("expected a decimal amount"));
        }

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| malformed("amount is too large"))?
        };

        let mut digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = i64::from(digits.next().is_some_and(|d| d >= 5));

        let cents = whole_units
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + round_up))
            .ok_or_else(|| malformed("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a pack quantity, `None` on overflow.
    ///
    /// ```rust
    /// use pricebook_core::money::Money;
    ///
    /// let unit = Money::from_cents(200);
    /// assert_eq!(unit.checked_multiply_quantity(10), Some(Money::from_cents(2000)));
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(qty)).map(Money)
    }

    /// Adds, clamping at the `i64` bounds instead of wrapping.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// The amount as a spreadsheet number (`37.5` for 3750 cents).
    ///
    /// Only for writing numeric cells. Never feed the result back into
    /// arithmetic.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders exactly two decimals without a currency symbol: `37.50`, `-5.50`.
///
/// This is the wire format of the csv export.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates like [`Money::saturating_add`].
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(3750);
        assert_eq!(money.cents(), 3750);
        assert_eq!(money.units(), 37);
        assert_eq!(money.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(3750).to_string(), "37.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_parse_decimal_plain_amounts() {
        assert_eq!(Money::parse_decimal("1.25").unwrap().cents(), 125);
        assert_eq!(Money::parse_decimal("2").unwrap().cents(), 200);
        assert_eq!(Money::parse_decimal("37.5").unwrap().cents(), 3750);
        assert_eq!(Money::parse_decimal(" 20.00 ").unwrap().cents(), 2000);
        assert_eq!(Money::parse_decimal("0").unwrap().cents(), 0);
        assert_eq!(Money::parse_decimal("3.").unwrap().cents(), 300);
        assert_eq!(Money::parse_decimal("-1.5").unwrap().cents(), -150);
    }

    /// Pins the rounding rule: half up on the third decimal.
    #[test]
    fn test_parse_decimal_rounds_half_up() {
        assert_eq!(Money::parse_decimal("1.255").unwrap().cents(), 126);
        assert_eq!(Money::parse_decimal("1.254").unwrap().cents(), 125);
        assert_eq!(Money::parse_decimal("1.2549").unwrap().cents(), 125);
        assert_eq!(Money::parse_decimal("0.005").unwrap().cents(), 1);
        assert_eq!(Money::parse_decimal("0.004").unwrap().cents(), 0);
        // Half up, not half even: 0.125 and 0.135 both round away.
        assert_eq!(Money::parse_decimal("0.125").unwrap().cents(), 13);
        assert_eq!(Money::parse_decimal("0.135").unwrap().cents(), 14);
        assert_eq!(Money::parse_decimal("9.995").unwrap().cents(), 1000);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal("1,25").is_err());
        assert!(Money::parse_decimal("1e3").is_err());
        assert!(Money::parse_decimal("1.2.3").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.saturating_add(b).cents(), 1500);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_sum_saturates() {
        let big = Money::from_cents(i64::MAX / 2 + 1);
        let total: Money = vec![big, big, big].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);

        let low = Money::from_cents(i64::MIN);
        assert_eq!(low.saturating_add(Money::from_cents(-1)).cents(), i64::MIN);
    }

    #[test]
    fn test_checked_multiply_quantity() {
        let unit = Money::from_cents(125);
        assert_eq!(unit.checked_multiply_quantity(30).unwrap().cents(), 3750);
        assert_eq!(Money::zero().checked_multiply_quantity(12).unwrap(), Money::zero());
        assert!(Money::from_cents(i64::MAX).checked_multiply_quantity(2).is_none());
    }

    #[test]
    fn test_as_f64() {
        assert!((Money::from_cents(3750).as_f64() - 37.5).abs() < f64::EPSILON);
        assert!((Money::from_cents(1).as_f64() - 0.01).abs() < 1e-12);
    }
}
