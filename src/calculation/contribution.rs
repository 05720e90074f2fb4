//! Per-scheme contribution dispatch.
//!
//! Every contribution method produces the same [`ContributionCalculation`];
//! this module picks the method from the rate table and holds the share
//! split shared by the banded and graduated methods.

use rust_decimal::Decimal;

use crate::config::{ContributionMethod, RateTable};
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditWarning, ContributionResult};

use super::fixed_amount::calculate_fixed_contribution;
use super::flat_percentage::calculate_flat_percentage_contribution;
use super::graduated::calculate_graduated_contribution;
use super::rounding::round_currency;

/// The result of evaluating one scheme, including its audit step.
#[derive(Debug, Clone)]
pub struct ContributionCalculation {
    /// The computed contribution.
    pub contribution: ContributionResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Warnings raised while calculating, if any.
    pub warnings: Vec<AuditWarning>,
}

/// Evaluates `table` on `base_amount` with the table's contribution method.
///
/// `base_amount` is the gross salary for every scheme except PAYE, which is
/// evaluated on taxable pay.
pub fn calculate_contribution(
    base_amount: Decimal,
    table: &RateTable,
    step_number: u32,
) -> EngineResult<ContributionCalculation> {
    match table.method {
        ContributionMethod::Banded => calculate_fixed_contribution(base_amount, table, step_number),
        ContributionMethod::Graduated => {
            calculate_graduated_contribution(base_amount, table, step_number)
        }
        ContributionMethod::FlatPercentage => {
            calculate_flat_percentage_contribution(base_amount, table, step_number)
        }
    }
}

/// Splits a whole-unit contribution into `(employee_share, employer_share)`.
///
/// The employee share is rounded and the employer share is the remainder,
/// so the two always add back up to `total` exactly.
///
/// # Examples
///
/// ```
/// use payroll_ke::calculation::split_contribution;
/// use rust_decimal::Decimal;
///
/// let (employee, employer) = split_contribution(Decimal::from(301), Decimal::new(5, 1));
/// assert_eq!(employee, Decimal::from(151));
/// assert_eq!(employer, Decimal::from(150));
/// ```
pub fn split_contribution(total: Decimal, employee_share_fraction: Decimal) -> (Decimal, Decimal) {
    let employee_share = round_currency(total * employee_share_fraction);
    (employee_share, total - employee_share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Band, BandCharge};
    use crate::models::SchemeId;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn single_band_table(scheme: SchemeId, method: ContributionMethod, charge: BandCharge) -> RateTable {
        RateTable {
            scheme,
            effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: None,
            method,
            relief: Decimal::ZERO,
            deductible_before_tax: false,
            legal_reference: String::new(),
            bands: vec![Band {
                min: Decimal::ZERO,
                max: None,
                charge,
                employee_share_fraction: Decimal::ONE,
            }],
        }
    }

    #[test]
    fn test_split_even_total() {
        assert_eq!(
            split_contribution(dec("300"), dec("0.5")),
            (dec("150"), dec("150"))
        );
    }

    #[test]
    fn test_split_odd_total_keeps_sum() {
        let (employee, employer) = split_contribution(dec("4321"), dec("0.5"));
        assert_eq!(employee, dec("2161"));
        assert_eq!(employer, dec("2160"));
        assert_eq!(employee + employer, dec("4321"));
    }

    #[test]
    fn test_split_employee_only() {
        assert_eq!(
            split_contribution(dec("1700"), Decimal::ONE),
            (dec("1700"), Decimal::ZERO)
        );
    }

    #[test]
    fn test_split_employer_only() {
        assert_eq!(
            split_contribution(dec("1700"), Decimal::ZERO),
            (Decimal::ZERO, dec("1700"))
        );
    }

    #[test]
    fn test_dispatch_follows_table_method() {
        let banded = single_band_table(
            SchemeId::Shif,
            ContributionMethod::Banded,
            BandCharge::Fixed {
                amount: dec("500"),
            },
        );
        let result = calculate_contribution(dec("20000"), &banded, 1).unwrap();
        assert_eq!(result.contribution.method, ContributionMethod::Banded);
        assert_eq!(result.contribution.total_contribution, dec("500"));

        let graduated = single_band_table(
            SchemeId::Paye,
            ContributionMethod::Graduated,
            BandCharge::Marginal {
                rate: dec("0.1"),
                fixed: Decimal::ZERO,
            },
        );
        let result = calculate_contribution(dec("20000"), &graduated, 1).unwrap();
        assert_eq!(result.contribution.method, ContributionMethod::Graduated);
        assert_eq!(result.contribution.total_contribution, dec("2000"));

        let flat = single_band_table(
            SchemeId::HousingLevy,
            ContributionMethod::FlatPercentage,
            BandCharge::Percentage {
                employee_rate: dec("0.015"),
                employer_rate: dec("0.015"),
            },
        );
        let result = calculate_contribution(dec("20000"), &flat, 1).unwrap();
        assert_eq!(result.contribution.method, ContributionMethod::FlatPercentage);
        assert_eq!(result.contribution.total_contribution, dec("600"));
    }
}
