//! Flat-percentage contribution calculation.
//!
//! Used for the Housing Levy and SHIF: the employee and the employer each
//! pay a percentage of gross salary. The employer part is an additional
//! employer cost rather than a split of one total, so the two parts are
//! rounded independently and their rates are never assumed to be equal.

use rust_decimal::Decimal;

use crate::config::{BandCharge, ContributionMethod, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ContributionResult};

use super::band_lookup::find_band;
use super::contribution::ContributionCalculation;
use super::rounding::round_currency;

/// Calculates a flat-percentage contribution on gross salary.
///
/// `employee_share = round(gross × employee_rate)` and
/// `employer_share = round(gross × employer_rate)`, taken from the matched
/// band. The total is their sum.
///
/// # Examples
///
/// ```
/// use payroll_ke::calculation::calculate_flat_percentage_contribution;
/// use payroll_ke::config::{Band, BandCharge, ContributionMethod, RateTable};
/// use payroll_ke::models::SchemeId;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let table = RateTable {
///     scheme: SchemeId::HousingLevy,
///     effective_date: NaiveDate::from_ymd_opt(2024, 3, 19).unwrap(),
///     expiry_date: None,
///     method: ContributionMethod::FlatPercentage,
///     relief: Decimal::ZERO,
///     deductible_before_tax: false,
///     legal_reference: String::new(),
///     bands: vec![Band {
///         min: Decimal::ZERO,
///         max: None,
///         charge: BandCharge::Percentage {
///             employee_rate: Decimal::new(15, 3),
///             employer_rate: Decimal::new(15, 3),
///         },
///         employee_share_fraction: Decimal::ONE,
///     }],
/// };
///
/// let result = calculate_flat_percentage_contribution(Decimal::from(100000), &table, 1).unwrap();
/// assert_eq!(result.contribution.employee_share, Decimal::from(1500));
/// assert_eq!(result.contribution.employer_share, Decimal::from(1500));
/// ```
pub fn calculate_flat_percentage_contribution(
    gross_salary: Decimal,
    table: &RateTable,
    step_number: u32,
) -> EngineResult<ContributionCalculation> {
    let band = find_band(gross_salary, table)?;

    let BandCharge::Percentage {
        employee_rate,
        employer_rate,
    } = band.charge
    else {
        return Err(EngineError::misconfigured(
            table.scheme,
            format!("band {} does not carry percentages", band.range_label()),
        ));
    };

    let employee_share = round_currency(gross_salary * employee_rate);
    let employer_share = round_currency(gross_salary * employer_rate);
    let total_contribution = employee_share + employer_share;

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("{}_contribution", table.scheme),
        rule_name: format!("{} Contribution", table.scheme.display_name()),
        legal_reference: table.legal_reference.clone(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "method": ContributionMethod::FlatPercentage.as_str(),
            "employee_rate": employee_rate.normalize().to_string(),
            "employer_rate": employer_rate.normalize().to_string(),
            "rate_table_effective_date": table.effective_date.to_string()
        }),
        output: serde_json::json!({
            "matched_band": band.range_label(),
            "total_contribution": total_contribution.to_string(),
            "employee_share": employee_share.to_string(),
            "employer_share": employer_share.to_string()
        }),
        reasoning: format!(
            "{} × {} = {} employee; {} × {} = {} employer",
            gross_salary.normalize(),
            employee_rate.normalize(),
            employee_share,
            gross_salary.normalize(),
            employer_rate.normalize(),
            employer_share
        ),
    };

    Ok(ContributionCalculation {
        contribution: ContributionResult {
            scheme: table.scheme,
            method: ContributionMethod::FlatPercentage,
            base_amount: gross_salary,
            matched_band: band.clone(),
            total_contribution,
            employee_share,
            employer_share,
        },
        audit_step,
        warnings: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Band;
    use crate::models::SchemeId;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn percentage_table(scheme: SchemeId, employee: &str, employer: &str) -> RateTable {
        RateTable {
            scheme,
            effective_date: NaiveDate::from_ymd_opt(2024, 12, 27).unwrap(),
            expiry_date: None,
            method: ContributionMethod::FlatPercentage,
            relief: Decimal::ZERO,
            deductible_before_tax: true,
            legal_reference: "Affordable Housing Act 2024".to_string(),
            bands: vec![Band {
                min: Decimal::ZERO,
                max: None,
                charge: BandCharge::Percentage {
                    employee_rate: dec(employee),
                    employer_rate: dec(employer),
                },
                employee_share_fraction: Decimal::ONE,
            }],
        }
    }

    #[test]
    fn test_housing_levy_matches_employee_and_employer() {
        let table = percentage_table(SchemeId::HousingLevy, "0.015", "0.015");
        let result = calculate_flat_percentage_contribution(dec("100000"), &table, 1).unwrap();

        assert_eq!(result.contribution.employee_share, dec("1500"));
        assert_eq!(result.contribution.employer_share, dec("1500"));
        assert_eq!(result.contribution.total_contribution, dec("3000"));
    }

    #[test]
    fn test_rates_may_differ() {
        let table = percentage_table(SchemeId::HousingLevy, "0.015", "0.02");
        let result = calculate_flat_percentage_contribution(dec("50000"), &table, 1).unwrap();

        assert_eq!(result.contribution.employee_share, dec("750"));
        assert_eq!(result.contribution.employer_share, dec("1000"));
    }

    #[test]
    fn test_shares_are_rounded_independently() {
        // 12,345 × 1.5% = 185.175 → 185 each way; 12,345 × 2.75% = 339.4875 → 339
        let levy = percentage_table(SchemeId::HousingLevy, "0.015", "0.015");
        let result = calculate_flat_percentage_contribution(dec("12345"), &levy, 1).unwrap();
        assert_eq!(result.contribution.employee_share, dec("185"));
        assert_eq!(result.contribution.employer_share, dec("185"));
        assert_eq!(result.contribution.total_contribution, dec("370"));

        let shif = percentage_table(SchemeId::Shif, "0.0275", "0");
        let result = calculate_flat_percentage_contribution(dec("12345"), &shif, 1).unwrap();
        assert_eq!(result.contribution.employee_share, dec("339"));
        assert_eq!(result.contribution.employer_share, Decimal::ZERO);
    }

    #[test]
    fn test_half_shilling_rounds_up() {
        // 100 × 1.5% = 1.5 → 2
        let table = percentage_table(SchemeId::HousingLevy, "0.015", "0.015");
        let result = calculate_flat_percentage_contribution(dec("100"), &table, 1).unwrap();
        assert_eq!(result.contribution.employee_share, dec("2"));
    }

    #[test]
    fn test_zero_gross_yields_zero() {
        let table = percentage_table(SchemeId::HousingLevy, "0.015", "0.015");
        let result = calculate_flat_percentage_contribution(Decimal::ZERO, &table, 1).unwrap();
        assert_eq!(result.contribution.total_contribution, Decimal::ZERO);
    }

    #[test]
    fn test_wrong_charge_kind_is_misconfiguration() {
        let mut table = percentage_table(SchemeId::HousingLevy, "0.015", "0.015");
        table.bands[0].charge = BandCharge::Fixed {
            amount: dec("100"),
        };

        let result = calculate_flat_percentage_contribution(dec("1000"), &table, 1);
        assert!(matches!(
            result,
            Err(EngineError::MisconfiguredRateTable {
                scheme: SchemeId::HousingLevy,
                ..
            })
        ));
    }

    #[test]
    fn test_audit_step_explains_both_shares() {
        let table = percentage_table(SchemeId::HousingLevy, "0.015", "0.015");
        let result = calculate_flat_percentage_contribution(dec("100000"), &table, 2).unwrap();

        assert_eq!(result.audit_step.rule_id, "housing_levy_contribution");
        assert_eq!(result.audit_step.rule_name, "Housing Levy Contribution");
        assert_eq!(result.audit_step.input["employee_rate"], "0.015");
        assert!(result.audit_step.reasoning.contains("100000 × 0.015 = 1500"));
    }
}
