//! Statutory scheme identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a Kenyan statutory deduction scheme.
///
/// The serialized form (`"paye"`, `"shif"`, `"nssf"`, `"housing_levy"`) is
/// used in rate-table files, API payloads and error messages alike.
///
/// # Example
///
/// ```
/// use payroll_ke::models::SchemeId;
///
/// assert_eq!(SchemeId::HousingLevy.to_string(), "housing_levy");
/// assert_eq!(SchemeId::EVALUATION_ORDER.last(), Some(&SchemeId::Paye));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeId {
    /// Pay-As-You-Earn income tax.
    Paye,
    /// Social Health Insurance Fund contribution.
    Shif,
    /// National Social Security Fund pension contribution.
    Nssf,
    /// Affordable Housing Levy.
    HousingLevy,
}

impl SchemeId {
    /// The order in which schemes are evaluated for a breakdown.
    ///
    /// NSSF comes first because its employee share is PAYE relief; SHIF and
    /// the Housing Levy only depend on gross pay; PAYE is evaluated last on
    /// taxable pay.
    pub const EVALUATION_ORDER: [SchemeId; 4] = [
        SchemeId::Nssf,
        SchemeId::Shif,
        SchemeId::HousingLevy,
        SchemeId::Paye,
    ];

    /// Returns the wire identifier of the scheme.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemeId::Paye => "paye",
            SchemeId::Shif => "shif",
            SchemeId::Nssf => "nssf",
            SchemeId::HousingLevy => "housing_levy",
        }
    }

    /// Returns the human-readable name of the scheme.
    pub fn display_name(self) -> &'static str {
        match self {
            SchemeId::Paye => "PAYE",
            SchemeId::Shif => "SHIF",
            SchemeId::Nssf => "NSSF",
            SchemeId::HousingLevy => "Housing Levy",
        }
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
