//! Breakdown models for the statutory contribution engine.
//!
//! This module contains the [`PayrollBreakdown`] type and its associated
//! structures that capture every output of a statutory calculation: one
//! [`ContributionResult`] per scheme, the totals, and the audit trace.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{Band, ContributionMethod};

use super::SchemeId;

/// The outcome of evaluating one statutory scheme.
///
/// # Example
///
/// ```
/// use payroll_ke::config::{Band, BandCharge, ContributionMethod};
/// use payroll_ke::models::{ContributionResult, SchemeId};
/// use rust_decimal::Decimal;
///
/// let result = ContributionResult {
///     scheme: SchemeId::Shif,
///     method: ContributionMethod::Banded,
///     base_amount: Decimal::from(6000),
///     matched_band: Band {
///         min: Decimal::from(6000),
///         max: Some(Decimal::from(8000)),
///         charge: BandCharge::Fixed { amount: Decimal::from(300) },
///         employee_share_fraction: Decimal::new(5, 1),
///     },
///     total_contribution: Decimal::from(300),
///     employee_share: Decimal::from(150),
///     employer_share: Decimal::from(150),
/// };
/// assert_eq!(result.employee_share + result.employer_share, result.total_contribution);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionResult {
    /// The scheme this contribution belongs to.
    pub scheme: SchemeId,
    /// The method the scheme's table was evaluated with.
    pub method: ContributionMethod,
    /// The amount the scheme was evaluated on (gross salary, or taxable pay for PAYE).
    pub base_amount: Decimal,
    /// The band the base amount fell into.
    pub matched_band: Band,
    /// The whole contribution, employee and employer parts together.
    pub total_contribution: Decimal,
    /// The part deducted from the employee's pay.
    pub employee_share: Decimal,
    /// The part paid by the employer on top of gross salary.
    pub employer_share: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Citation of the statute the applied rates come from.
    pub legal_reference: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation
/// but may deserve a payroll officer's attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a breakdown.
///
/// Contains no clocks or identifiers, so identical inputs always produce
/// identical traces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The statutory breakdown of one employee's gross pay for one pay period.
///
/// A value object: built once by the engine and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    /// The gross monthly salary the breakdown was computed for.
    pub gross_salary: Decimal,
    /// The date whose rate tables were applied.
    pub as_of_date: NaiveDate,
    /// Gross salary less allowable pre-tax relief; the PAYE base.
    pub taxable_pay: Decimal,
    /// One result per scheme, in evaluation order.
    pub contributions: Vec<ContributionResult>,
    /// Sum of every employee share.
    pub total_deductions: Decimal,
    /// Sum of every employer share.
    pub total_employer_contributions: Decimal,
    /// Gross salary less total deductions.
    pub net_pay: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl PayrollBreakdown {
    /// Returns the result for `scheme`, if it was evaluated.
    pub fn contribution(&self, scheme: SchemeId) -> Option<&ContributionResult> {
        self.contributions.iter().find(|c| c.scheme == scheme)
    }

    /// Returns what the employee costs the employer: gross pay plus employer contributions.
    ///
    /// Breakdowns from the engine never exceed
    /// [`MAX_GROSS_SALARY`](crate::calculation::MAX_GROSS_SALARY), so this sum stays in range.
    pub fn employer_cost(&self) -> Decimal {
        self.gross_salary + self.total_employer_contributions
    }
}
