//! # Pricing Engine
//!
//! Pure derivation of a [`TransactionSummary`] from a list of cart
//! lines. No side effects, no configuration beyond the fixed tax rate.
//!
//! ## Rounding policy
//! All three figures are rounded to 2 decimal places **independently**:
//! ```text
//! subtotal = round2(sum of line subtotals)
//! tax      = round2(subtotal * 0.18)
//! total    = round2(subtotal + tax)
//! ```
//! The total is NOT derived by rounding `subtotal * 1.18`; it may
//! therefore differ by one cent from an externally-rounded figure.
//! This mirrors the upstream settlement service and is preserved
//! deliberately.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::money::Money;
use crate::types::{CartLine, TransactionSummary};

/// Fixed tax rate applied to the pre-tax subtotal (IGV 18%).
pub const TAX_RATE: Decimal = dec!(0.18);

/// Computes subtotal, tax and total for a line list.
///
/// Deterministic and order-independent: permuting `lines` does not
/// change the result. An empty list yields the all-zero summary.
///
/// ## Example
/// ```rust
/// use mostrador_core::pricing::summarize;
///
/// assert!(summarize(&[]).total.is_zero());
/// ```
pub fn summarize(lines: &[CartLine]) -> TransactionSummary {
    let subtotal = lines
        .iter()
        .fold(Money::zero(), |acc, line| acc + line.subtotal)
        .round2();
    let tax = (subtotal * TAX_RATE).round2();
    let total = (subtotal + tax).round2();

    TransactionSummary {
        subtotal,
        tax,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
