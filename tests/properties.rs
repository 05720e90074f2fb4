//! Property tests for the statutory contribution engine.
//!
//! Salaries are generated in whole cents up to KES 5,000,000 and evaluated
//! against the shipped Kenyan rate tables, and against randomly generated
//! fixed-amount tables that pass validation.

use std::sync::LazyLock;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use payroll_ke::calculation::{
    calculate_fixed_contribution, calculate_graduated_contribution, calculate_payroll_breakdown,
    find_band,
};
use payroll_ke::config::{
    Band, BandCharge, ConfigLoader, ContributionMethod, RateTable, StatutoryConfig,
    validate_rate_table,
};
use payroll_ke::models::SchemeId;

static CONFIG: LazyLock<StatutoryConfig> = LazyLock::new(|| {
    ConfigLoader::load("./config/kenya")
        .expect("Failed to load config")
        .config()
        .clone()
});

fn config() -> &'static StatutoryConfig {
    &CONFIG
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
}

fn salary() -> impl Strategy<Value = Decimal> {
    (0i64..500_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Contiguous fixed-amount tables: up to eight bands of random width, odd
/// whole amounts and employee fractions in hundredths over [0, 1].
fn banded_table() -> impl Strategy<Value = RateTable> {
    prop::collection::vec((1i64..50_000, 0i64..5_000, 0i64..=100), 1..8).prop_map(|specs| {
        let last = specs.len() - 1;
        let mut min = Decimal::ZERO;
        let mut bands = Vec::with_capacity(specs.len());
        for (index, (width, amount, percent)) in specs.into_iter().enumerate() {
            let max = (index != last).then(|| min + Decimal::from(width));
            bands.push(Band {
                min,
                max,
                charge: BandCharge::Fixed {
                    amount: Decimal::from(amount * 2 + 1),
                },
                employee_share_fraction: Decimal::new(percent, 2),
            });
            if let Some(max) = max {
                min = max;
            }
        }

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
    })
}

fn banded_salary() -> impl Strategy<Value = Decimal> {
    (0i64..60_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_generated_banded_tables_pass_validation(table in banded_table()) {
        prop_assert!(validate_rate_table(&table).is_ok());
    }

    #[test]
    fn prop_banded_table_matches_exactly_one_band(
        table in banded_table(),
        salary in banded_salary()
    ) {
        let matching: Vec<&Band> = table.bands.iter().filter(|b| b.contains(salary)).collect();
        prop_assert_eq!(matching.len(), 1);

        let band = find_band(salary, &table).unwrap();
        prop_assert_eq!(band, matching[0]);
    }

    #[test]
    fn prop_band_boundary_belongs_to_upper_band(
        table in banded_table(),
        pick in any::<prop::sample::Index>()
    ) {
        let band = &table.bands[pick.index(table.bands.len())];
        let found = find_band(band.min, &table).unwrap();
        prop_assert_eq!(found, band);
    }

    #[test]
    fn prop_fixed_shares_sum_to_band_amount(
        table in banded_table(),
        salary in banded_salary()
    ) {
        let result = calculate_fixed_contribution(salary, &table, 1).unwrap();
        let c = &result.contribution;

        let BandCharge::Fixed { amount } = c.matched_band.charge else {
            return Err(TestCaseError::fail("matched band is not fixed"));
        };
        prop_assert_eq!(c.total_contribution, amount);
        prop_assert_eq!(c.employee_share + c.employer_share, c.total_contribution);
        prop_assert!(c.employee_share >= Decimal::ZERO);
        prop_assert!(c.employer_share >= Decimal::ZERO);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_every_salary_matches_exactly_one_band(salary in salary()) {
        let config = config();
        for table in config.tables_in_force(as_of()) {
            let matching = table.bands.iter().filter(|b| b.contains(salary)).count();
            prop_assert_eq!(matching, 1, "{} at {}", table.scheme, salary);

            let band = find_band(salary, table).unwrap();
            prop_assert!(band.contains(salary));
        }
    }

    #[test]
    fn prop_shares_sum_to_total(salary in salary()) {
        let breakdown = calculate_payroll_breakdown(salary, as_of(), config()).unwrap();
        for c in &breakdown.contributions {
            prop_assert_eq!(c.employee_share + c.employer_share, c.total_contribution);
        }
    }

    #[test]
    fn prop_amounts_are_non_negative_whole_shillings(salary in salary()) {
        let breakdown = calculate_payroll_breakdown(salary, as_of(), config()).unwrap();
        for c in &breakdown.contributions {
            prop_assert!(c.employee_share >= Decimal::ZERO);
            prop_assert!(c.employer_share >= Decimal::ZERO);
            prop_assert_eq!(c.total_contribution.fract(), Decimal::ZERO);
        }
        prop_assert!(breakdown.net_pay >= Decimal::ZERO);
        prop_assert!(breakdown.taxable_pay <= breakdown.gross_salary);
    }

    #[test]
    fn prop_net_pay_is_gross_less_employee_shares(salary in salary()) {
        let breakdown = calculate_payroll_breakdown(salary, as_of(), config()).unwrap();
        let deducted: Decimal = breakdown.contributions.iter().map(|c| c.employee_share).sum();
        let employer: Decimal = breakdown.contributions.iter().map(|c| c.employer_share).sum();

        prop_assert_eq!(breakdown.total_deductions, deducted);
        prop_assert_eq!(breakdown.total_employer_contributions, employer);
        prop_assert_eq!(breakdown.net_pay, salary - deducted);
    }

    #[test]
    fn prop_paye_is_monotonic_in_taxable_pay(a in salary(), b in salary()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let paye = config().table_for(SchemeId::Paye, as_of()).unwrap();

        let low = calculate_graduated_contribution(low, paye, 1).unwrap();
        let high = calculate_graduated_contribution(high, paye, 1).unwrap();
        prop_assert!(
            low.contribution.total_contribution <= high.contribution.total_contribution
        );
    }

    #[test]
    fn prop_identical_inputs_give_identical_breakdowns(salary in salary()) {
        let config = config();
        let first = calculate_payroll_breakdown(salary, as_of(), config).unwrap();
        let second = calculate_payroll_breakdown(salary, as_of(), config).unwrap();
        prop_assert_eq!(first, second);
    }
}
