//! Graduated (marginal-rate) contribution calculation.
//!
//! This module implements the progressive bracket walk used for PAYE and for
//! tiered pension contributions such as NSSF.
//!
//! ## Bracket Walk
//!
//! Each band taxes only the portion of income inside it:
//! - a band wholly below the income contributes `(max - min) × rate`
//! - the band containing the income contributes `(income - min) × rate`
//!
//! The table's relief is then subtracted (never below zero) and the result is
//! rounded once, so no rounding error accumulates across bands.

use rust_decimal::Decimal;

use crate::config::{BandCharge, ContributionMethod, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, ContributionResult};

use super::band_lookup::find_band;
use super::contribution::{ContributionCalculation, split_contribution};
use super::rounding::round_currency;

/// Walks the bands of a graduated table and returns the unrounded amount
/// due on `income` before relief.
///
/// # Errors
///
/// Returns `MisconfiguredRateTable` if a band the walk enters does not carry
/// a marginal charge.
pub fn graduated_amount(income: Decimal, table: &RateTable) -> EngineResult<Decimal> {
    let mut amount = Decimal::ZERO;

    for band in &table.bands {
        if income <= band.min {
            break;
        }

        let BandCharge::Marginal { rate, fixed } = band.charge else {
            return Err(EngineError::misconfigured(
                table.scheme,
                format!("band {} does not carry a marginal rate", band.range_label()),
            ));
        };

        let upper = match band.max {
            Some(max) if max < income => max,
            _ => income,
        };
        amount += (upper - band.min) * rate + fixed;
    }

    Ok(amount)
}

/// Calculates a graduated contribution on `base_amount`.
///
/// For PAYE, `base_amount` is taxable pay and the table's relief is the
/// monthly personal relief. The rounded amount is split with the matched
/// band's `employee_share_fraction`; PAYE tables always carry a fraction of
/// one, so PAYE has no employer share.
///
/// # Arguments
///
/// * `base_amount` - Taxable pay (PAYE) or gross salary (other schemes)
/// * `table` - A rate table whose bands carry marginal charges
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_ke::calculation::calculate_graduated_contribution;
/// use payroll_ke::config::{Band, BandCharge, ContributionMethod, RateTable};
/// use payroll_ke::models::SchemeId;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let band = |min: i64, max: Option<i64>, rate: Decimal| Band {
///     min: Decimal::from(min),
///     max: max.map(Decimal::from),
///     charge: BandCharge::Marginal { rate, fixed: Decimal::ZERO },
///     employee_share_fraction: Decimal::ONE,
/// };
/// let table = RateTable {
///     scheme: SchemeId::Paye,
///     effective_date: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
///     expiry_date: None,
///     method: ContributionMethod::Graduated,
///     relief: Decimal::from(2400),
///     deductible_before_tax: false,
///     legal_reference: String::new(),
///     bands: vec![
///         band(0, Some(24000), Decimal::new(10, 2)),
///         band(24000, None, Decimal::new(25, 2)),
///     ],
/// };
///
/// // 24,000 × 10% + 6,000 × 25% - 2,400 relief
/// let result = calculate_graduated_contribution(Decimal::from(30000), &table, 1).unwrap();
/// assert_eq!(result.contribution.total_contribution, Decimal::from(1500));
/// assert_eq!(result.contribution.employer_share, Decimal::ZERO);
/// ```
pub fn calculate_graduated_contribution(
    base_amount: Decimal,
    table: &RateTable,
    step_number: u32,
) -> EngineResult<ContributionCalculation> {
    let band = find_band(base_amount, table)?;
    let amount_before_relief = graduated_amount(base_amount, table)?;

    let amount_after_relief = (amount_before_relief - table.relief).max(Decimal::ZERO);
    let total_contribution = round_currency(amount_after_relief);
    let (employee_share, employer_share) =
        split_contribution(total_contribution, band.employee_share_fraction);

    let mut warnings = Vec::new();
    if !table.relief.is_zero()
        && amount_before_relief > Decimal::ZERO
        && amount_before_relief <= table.relief
    {
        warnings.push(AuditWarning {
            code: "RELIEF_EXCEEDS_AMOUNT".to_string(),
            message: format!(
                "{} relief of {} absorbs the full amount of {}",
                table.scheme.display_name(),
                table.relief,
                amount_before_relief.normalize()
            ),
            severity: "low".to_string(),
        });
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("{}_contribution", table.scheme),
        rule_name: format!("{} Contribution", table.scheme.display_name()),
        legal_reference: table.legal_reference.clone(),
        input: serde_json::json!({
            "base_amount": base_amount.to_string(),
            "method": ContributionMethod::Graduated.as_str(),
            "relief": table.relief.to_string(),
            "rate_table_effective_date": table.effective_date.to_string()
        }),
        output: serde_json::json!({
            "matched_band": band.range_label(),
            "amount_before_relief": amount_before_relief.normalize().to_string(),
            "amount_after_relief": amount_after_relief.normalize().to_string(),
            "total_contribution": total_contribution.to_string(),
            "employee_share": employee_share.to_string(),
            "employer_share": employer_share.to_string()
        }),
        reasoning: format!(
            "Graduated bands on {} up to band {} give {}; less relief of {} = {}, rounded to {}: {} employee + {} employer",
            base_amount.normalize(),
            band.range_label(),
            amount_before_relief.normalize(),
            table.relief.normalize(),
            amount_after_relief.normalize(),
            total_contribution,
            employee_share,
            employer_share
        ),
    };

    Ok(ContributionCalculation {
        contribution: ContributionResult {
            scheme: table.scheme,
            method: ContributionMethod::Graduated,
            base_amount,
            matched_band: band.clone(),
            total_contribution,
            employee_share,
            employer_share,
        },
        audit_step,
        warnings,
    })
}
