//! Calculation logic for the statutory contribution engine.
//!
//! This module contains band lookup, the three contribution methods
//! (fixed-amount, graduated and flat-percentage), currency rounding and the
//! assembly of a full payroll breakdown from per-scheme results.

mod band_lookup;
mod breakdown;
mod contribution;
mod fixed_amount;
mod flat_percentage;
mod graduated;
mod rounding;

pub use band_lookup::find_band;
pub use breakdown::{MAX_GROSS_SALARY, calculate_payroll_breakdown, resolve_rate_tables};
pub use contribution::{ContributionCalculation, calculate_contribution, split_contribution};
pub use fixed_amount::calculate_fixed_contribution;
pub use flat_percentage::calculate_flat_percentage_contribution;
pub use graduated::{calculate_graduated_contribution, graduated_amount};
pub use rounding::round_currency;
