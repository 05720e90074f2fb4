//! Rate-table validation.
//!
//! A table accepted here is guaranteed to match exactly one band for every
//! non-negative salary, and every band's charge agrees with the table's
//! contribution method.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::SchemeId;

use super::types::{BandCharge, ContributionMethod, RateTable};

/// Validates a rate table against the band and charge invariants.
///
/// # Errors
///
/// Returns `MisconfiguredRateTable` naming the table's scheme if:
/// - the table has no bands, or the first band does not start at zero
/// - a band is empty (`min >= max`), leaves a gap, or overlaps its successor
/// - a band other than the last is unbounded, or the last band is bounded
/// - a band's charge kind does not match the table's method
/// - an amount, rate, fraction or relief is out of range
/// - the expiry date precedes the effective date
pub fn validate_rate_table(table: &RateTable) -> EngineResult<()> {
    let scheme = table.scheme;
    let fail = |reason: String| Err(EngineError::misconfigured(scheme, reason));

    if let Some(expiry) = table.expiry_date {
        if expiry < table.effective_date {
            return fail(format!(
                "expiry date {} precedes effective date {}",
                expiry, table.effective_date
            ));
        }
    }

    if table.relief < Decimal::ZERO {
        return fail(format!("relief {} is negative", table.relief));
    }
    if !table.relief.is_zero() && table.method != ContributionMethod::Graduated {
        return fail(format!(
            "relief is only supported on graduated tables, not {}",
            table.method.as_str()
        ));
    }

    let Some(first) = table.bands.first() else {
        return fail("rate table has no bands".to_string());
    };
    if !first.min.is_zero() {
        return fail(format!("first band starts at {} instead of 0", first.min));
    }

    let last_index = table.bands.len() - 1;
    for (index, band) in table.bands.iter().enumerate() {
        match band.max {
            Some(max) => {
                if band.min >= max {
                    return fail(format!("band {} is empty or inverted", band.range_label()));
                }
                if index == last_index {
                    return fail(format!(
                        "final band {} must be unbounded",
                        band.range_label()
                    ));
                }
                let next_min = table.bands[index + 1].min;
                if next_min > max {
                    return fail(format!("bands leave a gap between {} and {}", max, next_min));
                }
                if next_min < max {
                    return fail(format!(
                        "band {} overlaps the band starting at {}",
                        band.range_label(),
                        next_min
                    ));
                }
            }
            None if index != last_index => {
                return fail(format!(
                    "band {} is unbounded but is not the final band",
                    band.range_label()
                ));
            }
            None => {}
        }

        if band.charge.method() != table.method {
            return fail(format!(
                "band {} has a {} charge in a {} table",
                band.range_label(),
                band.charge.method().as_str(),
                table.method.as_str()
            ));
        }

        if !is_fraction(band.employee_share_fraction) {
            return fail(format!(
                "band {} has employee share fraction {} outside [0, 1]",
                band.range_label(),
                band.employee_share_fraction
            ));
        }
        if scheme == SchemeId::Paye && band.employee_share_fraction != Decimal::ONE {
            return fail(format!(
                "band {} shifts part of PAYE to the employer",
                band.range_label()
            ));
        }

        match &band.charge {
            BandCharge::Fixed { amount } => {
                if *amount < Decimal::ZERO || !amount.fract().is_zero() {
                    return fail(format!(
                        "band {} amount {} is not a non-negative whole amount",
                        band.range_label(),
                        amount
                    ));
                }
            }
            BandCharge::Marginal { rate, fixed } => {
                if !is_fraction(*rate) {
                    return fail(format!(
                        "band {} rate {} is outside [0, 1]",
                        band.range_label(),
                        rate
                    ));
                }
                if *fixed < Decimal::ZERO {
                    return fail(format!(
                        "band {} fixed component {} is negative",
                        band.range_label(),
                        fixed
                    ));
                }
            }
            BandCharge::Percentage {
                employee_rate,
                employer_rate,
            } => {
                if !is_fraction(*employee_rate) || !is_fraction(*employer_rate) {
                    return fail(format!(
                        "band {} percentages {}/{} are outside [0, 1]",
                        band.range_label(),
                        employee_rate,
                        employer_rate
                    ));
                }
            }
        }
    }

    Ok(())
}

fn is_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Band;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fixed_band(min: &str, max: Option<&str>, amount: &str) -> Band {
        Band {
            min: dec(min),
            max: max.map(dec),
            charge: BandCharge::Fixed {
                amount: dec(amount),
            },
            employee_share_fraction: dec("0.5"),
        }
    }

    fn shif_table(bands: Vec<Band>) -> RateTable {
        RateTable {
            scheme: SchemeId::Shif,
            effective_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            expiry_date: None,
            method: ContributionMethod::Banded,
            relief: Decimal::ZERO,
            deductible_before_tax: false,
            legal_reference: String::new(),
            bands,
        }
    }

    fn assert_misconfigured(table: &RateTable, reason_fragment: &str) {
        match validate_rate_table(table) {
            Err(EngineError::MisconfiguredRateTable { scheme, reason }) => {
                assert_eq!(scheme, table.scheme);
                assert!(
                    reason.contains(reason_fragment),
                    "expected '{}' in '{}'",
                    reason_fragment,
                    reason
                );
            }
            other => panic!("Expected MisconfiguredRateTable, got {:?}", other),
        }
    }

    #[test]
    fn test_contiguous_bands_are_accepted() {
        let table = shif_table(vec![
            fixed_band("0", Some("6000"), "150"),
            fixed_band("6000", Some("8000"), "300"),
            fixed_band("8000", None, "400"),
        ]);
        assert!(validate_rate_table(&table).is_ok());
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert_misconfigured(&shif_table(vec![]), "no bands");
    }

    #[test]
    fn test_first_band_must_start_at_zero() {
        let table = shif_table(vec![fixed_band("100", None, "150")]);
        assert_misconfigured(&table, "instead of 0");
    }

    #[test]
    fn test_gap_is_rejected() {
        let table = shif_table(vec![
            fixed_band("0", Some("5999"), "150"),
            fixed_band("6000", None, "300"),
        ]);
        assert_misconfigured(&table, "gap between 5999 and 6000");
    }

    #[test]
    fn test_overlap_is_rejected() {
        let table = shif_table(vec![
            fixed_band("0", Some("6000"), "150"),
            fixed_band("5000", None, "300"),
        ]);
        assert_misconfigured(&table, "overlaps");
    }

    #[test]
    fn test_bounded_final_band_is_rejected() {
        let table = shif_table(vec![fixed_band("0", Some("6000"), "150")]);
        assert_misconfigured(&table, "must be unbounded");
    }

    #[test]
    fn test_unbounded_middle_band_is_rejected() {
        let table = shif_table(vec![
            fixed_band("0", None, "150"),
            fixed_band("6000", None, "300"),
        ]);
        assert_misconfigured(&table, "not the final band");
    }

    #[test]
    fn test_inverted_band_is_rejected() {
        let table = shif_table(vec![
            fixed_band("0", Some("0"), "150"),
            fixed_band("0", None, "300"),
        ]);
        assert_misconfigured(&table, "empty or inverted");
    }

    #[test]
    fn test_charge_must_match_method() {
        let mut table = shif_table(vec![fixed_band("0", None, "150")]);
        table.bands[0].charge = BandCharge::Marginal {
            rate: dec("0.1"),
            fixed: Decimal::ZERO,
        };
        assert_misconfigured(&table, "graduated charge in a banded table");
    }

    #[test]
    fn test_fractional_fixed_amount_is_rejected() {
        let table = shif_table(vec![fixed_band("0", None, "150.50")]);
        assert_misconfigured(&table, "whole amount");
    }

    #[test]
    fn test_share_fraction_out_of_range_is_rejected() {
        let mut table = shif_table(vec![fixed_band("0", None, "150")]);
        table.bands[0].employee_share_fraction = dec("1.5");
        assert_misconfigured(&table, "outside [0, 1]");
    }

    #[test]
    fn test_paye_cannot_split_with_employer() {
        let table = RateTable {
            scheme: SchemeId::Paye,
            method: ContributionMethod::Graduated,
            bands: vec![Band {
                min: Decimal::ZERO,
                max: None,
                charge: BandCharge::Marginal {
                    rate: dec("0.1"),
                    fixed: Decimal::ZERO,
                },
                employee_share_fraction: dec("0.5"),
            }],
            ..shif_table(vec![])
        };
        assert_misconfigured(&table, "PAYE");
    }

    #[test]
    fn test_relief_only_on_graduated_tables() {
        let mut table = shif_table(vec![fixed_band("0", None, "150")]);
        table.relief = dec("2400");
        assert_misconfigured(&table, "relief is only supported");
    }

    #[test]
    fn test_expiry_before_effective_is_rejected() {
        let mut table = shif_table(vec![fixed_band("0", None, "150")]);
        table.expiry_date = NaiveDate::from_ymd_opt(2024, 9, 30);
        assert_misconfigured(&table, "precedes effective date");
    }

    #[test]
    fn test_percentage_above_one_is_rejected() {
        let table = RateTable {
            scheme: SchemeId::HousingLevy,
            method: ContributionMethod::FlatPercentage,
            bands: vec![Band {
                min: Decimal::ZERO,
                max: None,
                charge: BandCharge::Percentage {
                    employee_rate: dec("1.5"),
                    employer_rate: dec("1.5"),
                },
                employee_share_fraction: Decimal::ONE,
            }],
            ..shif_table(vec![])
        };
        assert_misconfigured(&table, "outside [0, 1]");
    }
}
