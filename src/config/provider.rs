//! The seam between the engine and wherever rate tables come from.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::SchemeId;

use super::loader::ConfigLoader;
use super::types::{RateTable, StatutoryConfig};

/// Supplies the rate table in force for a scheme on a given date.
///
/// The engine only reads through this trait, so a loaded
/// [`StatutoryConfig`] and a hand-built map of tables are interchangeable.
pub trait RateTableProvider {
    /// Returns the table for `scheme` in force on `as_of_date`, or `None`
    /// if no table covers that date.
    fn rate_table(&self, scheme: SchemeId, as_of_date: NaiveDate) -> Option<&RateTable>;
}

impl RateTableProvider for StatutoryConfig {
    fn rate_table(&self, scheme: SchemeId, as_of_date: NaiveDate) -> Option<&RateTable> {
        self.table_for(scheme, as_of_date)
    }
}

impl RateTableProvider for ConfigLoader {
    fn rate_table(&self, scheme: SchemeId, as_of_date: NaiveDate) -> Option<&RateTable> {
        self.config().table_for(scheme, as_of_date)
    }
}

/// A single table per scheme, honoured only inside its validity window.
impl RateTableProvider for HashMap<SchemeId, RateTable> {
    fn rate_table(&self, scheme: SchemeId, as_of_date: NaiveDate) -> Option<&RateTable> {
        self.get(&scheme)
            .filter(|table| table.is_in_force(as_of_date))
    }
}
