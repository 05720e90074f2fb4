//! Payroll breakdown assembly.
//!
//! This module orchestrates the per-scheme calculations in their dependency
//! order and assembles the [`PayrollBreakdown`].
//!
//! ## Evaluation Order
//!
//! 1. NSSF, whose employee share is allowable relief against PAYE
//! 2. SHIF and the Housing Levy, which depend only on gross salary
//! 3. PAYE, on gross salary less the employee shares of every scheme whose
//!    table is marked `deductible_before_tax`

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{RateTable, RateTableProvider, validate_rate_table};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditTrace, PayrollBreakdown, SchemeId};

use super::contribution::calculate_contribution;

/// The largest gross monthly salary the engine accepts: KES one trillion.
///
/// Keeps every per-employee amount, and sums of them across a batch, far
/// inside the range of `Decimal`.
pub const MAX_GROSS_SALARY: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Resolves and validates the table of every scheme for `as_of_date`.
///
/// Tables are returned in [`SchemeId::EVALUATION_ORDER`]. Resolution happens
/// before any arithmetic so that a missing or malformed table fails the
/// whole breakdown rather than producing a partial one.
///
/// # Errors
///
/// Returns `MisconfiguredRateTable` naming the first scheme that has no table
/// in force on `as_of_date`, whose table declares a different scheme, or
/// whose table breaks the band invariants.
pub fn resolve_rate_tables<'a, P>(
    as_of_date: NaiveDate,
    rate_tables: &'a P,
) -> EngineResult<Vec<&'a RateTable>>
where
    P: RateTableProvider + ?Sized,
{
    SchemeId::EVALUATION_ORDER
        .iter()
        .map(|&scheme| {
            let table = rate_tables.rate_table(scheme, as_of_date).ok_or_else(|| {
                EngineError::misconfigured(
                    scheme,
                    format!("no rate table in force on {}", as_of_date),
                )
            })?;

            if table.scheme != scheme {
                return Err(EngineError::misconfigured(
                    scheme,
                    format!("table supplied for {} declares scheme {}", scheme, table.scheme),
                ));
            }

            validate_rate_table(table)?;
            Ok(table)
        })
        .collect()
}

/// Computes the statutory breakdown of a gross monthly salary.
///
/// This is the engine's entry point: a pure function of the salary, the
/// date and the rate tables. It performs no I/O and keeps no state, so
/// calls for different employees can run in parallel freely.
///
/// # Arguments
///
/// * `gross_salary` - Gross monthly salary in KES
/// * `as_of_date` - The date whose rate tables apply (usually the pay date)
/// * `rate_tables` - Where the versioned tables are read from
///
/// # Returns
///
/// Returns the breakdown, or an error if:
/// - `gross_salary` is negative or above [`MAX_GROSS_SALARY`] (`InvalidInput`)
/// - any scheme's table is missing or malformed (`MisconfiguredRateTable`)
/// - the statutory deductions exceed the gross salary (`InvalidInput`)
///
/// # Examples
///
/// ```no_run
/// use payroll_ke::calculation::calculate_payroll_breakdown;
/// use payroll_ke::config::ConfigLoader;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/kenya")?;
/// let date = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
/// let breakdown = calculate_payroll_breakdown(Decimal::from(100000), date, loader.config())?;
/// println!("Net pay: KES {}", breakdown.net_pay);
/// # Ok::<(), payroll_ke::error::EngineError>(())
/// ```
pub fn calculate_payroll_breakdown<P>(
    gross_salary: Decimal,
    as_of_date: NaiveDate,
    rate_tables: &P,
) -> EngineResult<PayrollBreakdown>
where
    P: RateTableProvider + ?Sized,
{
    if gross_salary < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "gross_salary",
            format!("{} must not be negative", gross_salary),
        ));
    }

    if gross_salary > MAX_GROSS_SALARY {
        return Err(EngineError::invalid_input(
            "gross_salary",
            format!("{} exceeds the maximum of {}", gross_salary, MAX_GROSS_SALARY),
        ));
    }

    let tables = resolve_rate_tables(as_of_date, rate_tables)?;

    let mut audit_trace = AuditTrace::default();
    let mut contributions = Vec::with_capacity(tables.len());
    let mut step_number: u32 = 1;
    let mut pre_tax_relief = Decimal::ZERO;
    let mut taxable_pay = gross_salary;

    for table in tables {
        let base_amount = if table.scheme == SchemeId::Paye {
            taxable_pay = (gross_salary - pre_tax_relief).max(Decimal::ZERO);
            audit_trace.steps.push(AuditStep {
                step_number,
                rule_id: "taxable_pay".to_string(),
                rule_name: "Taxable Pay".to_string(),
                legal_reference: table.legal_reference.clone(),
                input: serde_json::json!({
                    "gross_salary": gross_salary.to_string(),
                    "pre_tax_relief": pre_tax_relief.to_string()
                }),
                output: serde_json::json!({
                    "taxable_pay": taxable_pay.to_string()
                }),
                reasoning: format!(
                    "Gross {} less allowable statutory contributions of {} = taxable pay {}",
                    gross_salary.normalize(),
                    pre_tax_relief,
                    taxable_pay.normalize()
                ),
            });
            step_number += 1;
            taxable_pay
        } else {
            gross_salary
        };

        let calculation = calculate_contribution(base_amount, table, step_number)?;
        step_number += 1;

        if table.deductible_before_tax && table.scheme != SchemeId::Paye {
            pre_tax_relief += calculation.contribution.employee_share;
        }

        audit_trace.steps.push(calculation.audit_step);
        audit_trace.warnings.extend(calculation.warnings);
        contributions.push(calculation.contribution);
    }

    let total_deductions: Decimal = contributions.iter().map(|c| c.employee_share).sum();
    let total_employer_contributions: Decimal =
        contributions.iter().map(|c| c.employer_share).sum();

    if total_deductions > gross_salary {
        return Err(EngineError::invalid_input(
            "gross_salary",
            format!(
                "statutory deductions of {} exceed gross salary {}",
                total_deductions, gross_salary
            ),
        ));
    }
    let net_pay = gross_salary - total_deductions;

    audit_trace.steps.push(AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        legal_reference: String::new(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "total_deductions": total_deductions.to_string()
        }),
        output: serde_json::json!({
            "net_pay": net_pay.to_string(),
            "total_employer_contributions": total_employer_contributions.to_string()
        }),
        reasoning: format!(
            "Gross {} less statutory deductions {} = net pay {}",
            gross_salary.normalize(),
            total_deductions,
            net_pay.normalize()
        ),
    });

    debug!(
        gross_salary = %gross_salary,
        as_of_date = %as_of_date,
        total_deductions = %total_deductions,
        net_pay = %net_pay,
        "Computed statutory breakdown"
    );

    Ok(PayrollBreakdown {
        gross_salary,
        as_of_date,
        taxable_pay,
        contributions,
        total_deductions,
        total_employer_contributions,
        net_pay,
        audit_trace,
    })
}
