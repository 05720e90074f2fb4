//! Configuration types for statutory rate tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::SchemeId;

use super::validation::validate_rate_table;

/// Metadata about the jurisdiction whose rates are configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionMetadata {
    /// ISO country code (e.g., "KE").
    pub code: String,
    /// The human-readable name of the jurisdiction.
    pub name: String,
    /// ISO currency code all amounts are expressed in (e.g., "KES").
    pub currency: String,
    /// URL to the authority publishing the rates.
    pub source_url: String,
}

/// How a rate table turns a salary into a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionMethod {
    /// The matched band charges a fixed amount, split between employee and employer.
    Banded,
    /// Each band taxes only the portion of income falling within it.
    Graduated,
    /// The matched band charges independent employee and employer percentages of gross.
    FlatPercentage,
}

impl ContributionMethod {
    /// Returns the wire identifier of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            ContributionMethod::Banded => "banded",
            ContributionMethod::Graduated => "graduated",
            ContributionMethod::FlatPercentage => "flat_percentage",
        }
    }
}

/// What a band charges once a salary falls into (or through) it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BandCharge {
    /// A fixed contribution in whole currency units.
    Fixed {
        /// The contribution amount for any salary in the band.
        amount: Decimal,
    },
    /// A marginal rate applied to the portion of income inside the band.
    Marginal {
        /// The marginal rate as a fraction (0.30 for 30%).
        rate: Decimal,
        /// A per-band surcharge, added once for every band the income
        /// reaches into, on top of that band's marginal part.
        ///
        /// This is not a cumulative "base + rate × excess" figure: the walk
        /// already sums the lower bands, so a cumulative base here would be
        /// counted twice.
        #[serde(default)]
        fixed: Decimal,
    },
    /// Percentages of the whole salary borne by employee and employer.
    Percentage {
        /// The employee's rate as a fraction of gross.
        employee_rate: Decimal,
        /// The employer's rate as a fraction of gross.
        #[serde(default)]
        employer_rate: Decimal,
    },
}

impl BandCharge {
    /// Returns the contribution method this charge belongs to.
    pub fn method(&self) -> ContributionMethod {
        match self {
            BandCharge::Fixed { .. } => ContributionMethod::Banded,
            BandCharge::Marginal { .. } => ContributionMethod::Graduated,
            BandCharge::Percentage { .. } => ContributionMethod::FlatPercentage,
        }
    }
}

fn default_employee_share_fraction() -> Decimal {
    Decimal::ONE
}

/// A salary range with its associated charge.
///
/// Ranges are half-open: a band covers `min <= salary < max`, and a band
/// without `max` extends to infinity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    /// Inclusive lower bound.
    pub min: Decimal,
    /// Exclusive upper bound; `None` for the final, unbounded band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    /// The amount or rate charged within this band.
    pub charge: BandCharge,
    /// Fraction of the computed contribution borne by the employee.
    #[serde(default = "default_employee_share_fraction")]
    pub employee_share_fraction: Decimal,
}

impl Band {
    /// Returns true if `salary` falls inside `[min, max)`.
    pub fn contains(&self, salary: Decimal) -> bool {
        salary >= self.min && self.max.is_none_or(|max| salary < max)
    }

    /// Returns a human-readable rendering of the range, e.g. `[24000, 32333)`.
    pub fn range_label(&self) -> String {
        match self.max {
            Some(max) => format!("[{}, {})", self.min, max),
            None => format!("[{}, ∞)", self.min),
        }
    }
}

/// A versioned rate table for one statutory scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// The scheme these rates belong to.
    pub scheme: SchemeId,
    /// First day the rates apply (inclusive).
    pub effective_date: NaiveDate,
    /// Last day the rates apply (inclusive); `None` until superseded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    /// How contributions are computed from the bands.
    pub method: ContributionMethod,
    /// Flat relief subtracted from graduated tax (e.g., personal relief).
    #[serde(default)]
    pub relief: Decimal,
    /// Whether the employee share is allowable relief against PAYE.
    #[serde(default)]
    pub deductible_before_tax: bool,
    /// Citation of the statute or notice the rates come from.
    #[serde(default)]
    pub legal_reference: String,
    /// Ordered, non-overlapping bands covering `[0, ∞)`.
    pub bands: Vec<Band>,
}

impl RateTable {
    /// Returns true if the table applies on `date`.
    pub fn is_in_force(&self, date: NaiveDate) -> bool {
        self.effective_date <= date && self.expiry_date.is_none_or(|expiry| date <= expiry)
    }
}

/// The complete statutory configuration loaded from YAML files.
///
/// Tables are validated on construction and grouped per scheme, sorted
/// oldest first, so lookups by date can take the most recent version
/// effective on or before the requested date.
#[derive(Debug, Clone)]
pub struct StatutoryConfig {
    /// Jurisdiction metadata.
    jurisdiction: JurisdictionMetadata,
    /// Rate tables by scheme (each sorted by effective date).
    tables: BTreeMap<SchemeId, Vec<RateTable>>,
}

impl StatutoryConfig {
    /// Creates a new configuration, validating every table.
    ///
    /// Fails with `MisconfiguredRateTable` if any table breaks the band
    /// invariants, or if two versions of a scheme share an effective date or
    /// have overlapping validity windows.
    pub fn new(jurisdiction: JurisdictionMetadata, tables: Vec<RateTable>) -> EngineResult<Self> {
        let mut grouped: BTreeMap<SchemeId, Vec<RateTable>> = BTreeMap::new();
        for table in tables {
            validate_rate_table(&table)?;
            grouped.entry(table.scheme).or_default().push(table);
        }

        for (scheme, versions) in grouped.iter_mut() {
            versions.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
            for pair in versions.windows(2) {
                let (earlier, later) = (&pair[0], &pair[1]);
                if earlier.effective_date == later.effective_date {
                    return Err(EngineError::misconfigured(
                        *scheme,
                        format!(
                            "two rate tables share the effective date {}",
                            later.effective_date
                        ),
                    ));
                }
                if earlier
                    .expiry_date
                    .is_some_and(|expiry| expiry >= later.effective_date)
                {
                    return Err(EngineError::misconfigured(
                        *scheme,
                        format!(
                            "rate table effective {} overlaps the table effective {}",
                            earlier.effective_date, later.effective_date
                        ),
                    ));
                }
            }
        }

        Ok(Self {
            jurisdiction,
            tables: grouped,
        })
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.jurisdiction
    }

    /// Returns every configured version of a scheme's table, oldest first.
    pub fn tables(&self, scheme: SchemeId) -> &[RateTable] {
        self.tables.get(&scheme).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the table for `scheme` in force on `date`, if any.
    pub fn table_for(&self, scheme: SchemeId, date: NaiveDate) -> Option<&RateTable> {
        self.tables(scheme)
            .iter()
            .rfind(|table| table.effective_date <= date)
            .filter(|table| table.is_in_force(date))
    }

    /// Returns every table in force on `date`, in evaluation order.
    pub fn tables_in_force(&self, date: NaiveDate) -> Vec<&RateTable> {
        SchemeId::EVALUATION_ORDER
            .iter()
            .filter_map(|scheme| self.table_for(*scheme, date))
            .collect()
    }
}
