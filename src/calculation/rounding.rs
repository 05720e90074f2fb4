//! Currency rounding.
//!
//! KES has no sub-unit in payroll practice, so every contribution is
//! rounded to whole shillings, half-up.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to whole currency units, with halves rounded up.
///
/// # Examples
///
/// ```
/// use payroll_ke::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("2083.50").unwrap()), Decimal::from(2084));
/// assert_eq!(round_currency(Decimal::from_str("2083.49").unwrap()), Decimal::from(2083));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
