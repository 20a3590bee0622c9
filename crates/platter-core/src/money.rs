//! # Money Module
//!
//! Provides the `Money` type for prices and totals.
//!
//! ## Units
//! The backend reports menu prices as whole currency units (rupees), so a
//! `Money` holds an integral count of that unit. Cart totals are computed
//! with integer arithmetic only:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MenuItem.price ──► CartItem.price ──► line_total = price × quantity    │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                          Cart.total = Σ line_total (recomputed on read)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use platter_core::money::Money;
//!
//! let price = Money::from_units(250);
//! assert_eq!(price * 3, Money::from_units(750));
//! assert_eq!(price + Money::from_units(50), Money::from_units(300));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// A monetary amount in whole currency units.
///
/// Serialized transparently as a JSON number so it matches the API's
/// `price` fields.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the amount in whole units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
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

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Formats the amount with a currency symbol, e.g. `₹250`.
    pub fn format_with(&self, symbol: &str) -> String {
        if self.0 < 0 {
            format!("-{}{}", symbol, self.0.unsigned_abs())
        } else {
            format!("{}{}", symbol, self.0)
        }
    }
}

// =============================================================================
// Arithmetic
// =============================================================================
// Prices arrive from the server and may be arbitrarily large, so every
// operation saturates at the i64 bounds instead of overflowing.

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

/// Multiplies a price by a quantity.
impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_multiplication() {
        assert_eq!(Money::from_units(10) * 3, Money::from_units(30));
        assert_eq!(Money::from_units(10) * 0, Money::zero());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_units(i64::MAX);
        assert_eq!(max * 2, max);
        assert_eq!(max + Money::from_units(1), max);
        assert_eq!(Money::from_units(i64::MIN) * 3, Money::from_units(i64::MIN));

        let mut total = Money::from_units(i64::MAX / 2 + 1);
        total += Money::from_units(i64::MAX / 2 + 1);
        assert_eq!(total, max);

        let sum: Money = vec![max, max, Money::from_units(5)].into_iter().sum();
        assert_eq!(sum, max);
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total: Money = Vec::<Money>::new().into_iter().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_units(250).format_with("₹"), "₹250");
        assert_eq!(Money::from_units(-5).format_with("$"), "-$5");
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_units(99)).unwrap();
        assert_eq!(json, "99");
        let back: Money = serde_json::from_str("99").unwrap();
        assert_eq!(back, Money::from_units(99));
    }
}
