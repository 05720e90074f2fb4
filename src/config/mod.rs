//! Configuration loading and management for the statutory contribution engine.
//!
//! This module provides the typed, versioned rate tables the engine reads,
//! their validation rules, and a loader for YAML configuration directories.
//!
//! # Example
//!
//! ```no_run
//! use payroll_ke::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/kenya").unwrap();
//! println!("Loaded rates for: {}", config.jurisdiction().name);
//! ```

mod loader;
mod provider;
mod types;
mod validation;

pub use loader::ConfigLoader;
pub use provider::RateTableProvider;
pub use types::{
    Band, BandCharge, ContributionMethod, JurisdictionMetadata, RateTable, StatutoryConfig,
};
pub use validation::validate_rate_table;
