//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! Every monetary value in the system flows through this type:
//! product prices, line subtotals, the transaction summary, and the
//! cash tendered at settlement. Amounts are exact decimals, rounded
//! to 2 places with [`Money::round2`] wherever the pricing policy
//! requires it. Floating point never enters the arithmetic.
//!
//! ## Usage
//! ```rust
//! use mostrador_core::money::Money;
//! use rust_decimal_macros::dec;
//!
//! let unit_price = Money::new(dec!(10.00));
//! let line = unit_price.times(3);
//! assert_eq!(line, Money::new(dec!(30.00)));
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the store currency.
///
/// Thin newtype over [`Decimal`]. Serializes as a decimal string
/// (`"118.00"`), which is also the shape the TypeScript frontend sees.
///
/// ## Invariants
/// - Arithmetic is exact; rounding happens only at the explicit
///   [`Money::round2`] call sites required by the pricing policy.
/// - Rounding is half-away-from-zero at 2 decimal places.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(transparent)]
pub struct Money(#[ts(as = "String")] Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps a raw decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money::ZERO
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to 2 decimal places, half away from zero.
    ///
    /// This is the single rounding rule of the pricing policy. Ties go
    /// away from zero (`0.005 -> 0.01`), not to even; the upstream
    /// services round the same way.
    #[inline]
    pub fn round2(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiplies by an integer quantity.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// let unit_price = Money::new(dec!(2.99));
    /// assert_eq!(unit_price.times(3), Money::new(dec!(8.97)));
    /// ```
    #[inline]
    pub fn times(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the bare 2-decimal amount (`118.00`).
///
/// Currency symbols are a presentation concern; see
/// `Settings::format_amount` in the engine crate.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round2().0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Parses a decimal string such as the tendered-amount field of the
/// payment dialog (`"150.00"`).
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .map(Money)
            .map_err(|_| CoreError::InvalidAmount {
                input: trimmed.to_string(),
            })
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a rate (e.g. the tax rate). Result is unrounded.
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, rate: Decimal) -> Self {
        Money(self.0 * rate)
    }
}

/// Multiplication by an integer quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.times(qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
