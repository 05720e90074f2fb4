//! Fixed-amount (banded) contribution calculation.
//!
//! Each band charges a flat amount for any salary that falls into it; the
//! amount is then split between employee and employer.

use rust_decimal::Decimal;

use crate::config::{BandCharge, ContributionMethod, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ContributionResult};

use super::band_lookup::find_band;
use super::contribution::{ContributionCalculation, split_contribution};

/// Calculates a banded fixed-amount contribution.
///
/// The matched band's amount is the total contribution. The employee share
/// is `round(total × employee_share_fraction)` and the employer share is the
/// remainder, so the shares always add up to the total.
///
/// # Arguments
///
/// * `salary` - The gross salary the band is selected by
/// * `table` - A rate table whose bands carry fixed charges
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns the contribution and its audit step, or an error if the salary is
/// negative or the matched band does not carry a fixed charge.
///
/// # Examples
///
/// ```
/// use payroll_ke::calculation::calculate_fixed_contribution;
/// use payroll_ke::config::{Band, BandCharge, ContributionMethod, RateTable};
/// use payroll_ke::models::SchemeId;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let band = |min: i64, max: Option<i64>, amount: i64| Band {
///     min: Decimal::from(min),
///     max: max.map(Decimal::from),
///     charge: BandCharge::Fixed { amount: Decimal::from(amount) },
///     employee_share_fraction: Decimal::new(5, 1),
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
/// let result = calculate_fixed_contribution(Decimal::from(6000), &table, 1).unwrap();
/// assert_eq!(result.contribution.total_contribution, Decimal::from(300));
/// assert_eq!(result.contribution.employee_share, Decimal::from(150));
/// ```
pub fn calculate_fixed_contribution(
    salary: Decimal,
    table: &RateTable,
    step_number: u32,
) -> EngineResult<ContributionCalculation> {
    let band = find_band(salary, table)?;

    let BandCharge::Fixed { amount } = band.charge else {
        return Err(EngineError::misconfigured(
            table.scheme,
            format!("band {} does not carry a fixed amount", band.range_label()),
        ));
    };

    let total_contribution = amount;
    let (employee_share, employer_share) =
        split_contribution(total_contribution, band.employee_share_fraction);

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("{}_contribution", table.scheme),
        rule_name: format!("{} Contribution", table.scheme.display_name()),
        legal_reference: table.legal_reference.clone(),
        input: serde_json::json!({
            "salary": salary.to_string(),
            "method": ContributionMethod::Banded.as_str(),
            "rate_table_effective_date": table.effective_date.to_string()
        }),
        output: serde_json::json!({
            "matched_band": band.range_label(),
            "total_contribution": total_contribution.to_string(),
            "employee_share": employee_share.to_string(),
            "employer_share": employer_share.to_string()
        }),
        reasoning: format!(
            "Salary {} falls in band {} with a fixed contribution of {}; employee bears {} of it: {} employee + {} employer",
            salary.normalize(),
            band.range_label(),
            total_contribution,
            band.employee_share_fraction.normalize(),
            employee_share,
            employer_share
        ),
    };

    Ok(ContributionCalculation {
        contribution: ContributionResult {
            scheme: table.scheme,
            method: ContributionMethod::Banded,
            base_amount: salary,
            matched_band: band.clone(),
            total_contribution,
            employee_share,
            employer_share,
        },
        audit_step,
        warnings: Vec::new(),
    })
}
