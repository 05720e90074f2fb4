//! Band lookup functionality.
//!
//! This module provides the range lookup every contribution method starts
//! from: finding the single band of a rate table that contains a salary.

use rust_decimal::Decimal;

use crate::config::{Band, RateTable};
use crate::error::{EngineError, EngineResult};

/// Finds the band of `table` whose `[min, max)` range contains `salary`.
///
/// Ranges are half-open, so a salary exactly equal to a band's `max`
/// resolves to the next band.
///
/// # Returns
///
/// Returns the matching band, or an error if:
/// - `salary` is negative (`InvalidInput`)
/// - no band contains `salary` (`MisconfiguredRateTable`), which can only
///   happen for a table that does not partition `[0, ∞)`
///
/// # Examples
///
/// ```
/// use payroll_ke::calculation::find_band;
/// use payroll_ke::config::{Band, BandCharge, ContributionMethod, RateTable};
/// use payroll_ke::models::SchemeId;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let band = |min: i64, max: Option<i64>, amount: i64| Band {
///     min: Decimal::from(min),
///     max: max.map(Decimal::from),
///     charge: BandCharge::Fixed { amount: Decimal::from(amount) },
///     employee_share_fraction: Decimal::ONE,
/// };
/// let table = RateTable {
///     scheme: SchemeId::Shif,
///     effective_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
///     expiry_date: None,
///     method: ContributionMethod::Banded,
///     relief: Decimal::ZERO,
///     deductible_before_tax: false,
///     legal_reference: String::new(),
///     bands: vec![band(0, Some(6000), 150), band(6000, None, 300)],
/// };
///
/// let matched = find_band(Decimal::from(6000), &table).unwrap();
/// assert_eq!(matched.min, Decimal::from(6000));
/// ```
pub fn find_band(salary: Decimal, table: &RateTable) -> EngineResult<&Band> {
    if salary < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "salary",
            format!("{} must not be negative", salary),
        ));
    }

    table
        .bands
        .iter()
        .find(|band| band.contains(salary))
        .ok_or_else(|| {
            EngineError::misconfigured(
                table.scheme,
                format!("no band contains salary {}", salary),
            )
        })
}
