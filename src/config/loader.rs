//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory
//! rate tables from YAML files.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::types::{JurisdictionMetadata, RateTable, StatutoryConfig};

/// Loads and provides access to statutory rate configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates every rate table, and keeps them read-only for the lifetime
/// of the process.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/kenya/
/// ├── jurisdiction.yaml              # Jurisdiction metadata
/// └── rates/
///     ├── paye-2023-07-01.yaml       # One file per scheme version
///     ├── nssf-2025-02-01.yaml
///     └── ...
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_ke::config::ConfigLoader;
/// use payroll_ke::models::SchemeId;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/kenya")?;
/// let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let paye = loader.config().table_for(SchemeId::Paye, date);
/// println!("PAYE bands: {}", paye.map(|t| t.bands.len()).unwrap_or(0));
/// # Ok::<(), payroll_ke::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: StatutoryConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `jurisdiction.yaml` or the `rates` directory is missing (`ConfigNotFound`)
    /// - any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - any rate table breaks the band invariants (`MisconfiguredRateTable`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let jurisdiction =
            Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let tables = Self::load_rate_tables(&path.join("rates"))?;
        let table_count = tables.len();

        let config = StatutoryConfig::new(jurisdiction, tables)?;

        info!(
            path = %path.display(),
            jurisdiction = %config.jurisdiction().code,
            tables = table_count,
            "Loaded statutory rate tables"
        );

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: StatutoryConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every rate table file from the rates directory.
    fn load_rate_tables(rates_dir: &Path) -> EngineResult<Vec<RateTable>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                let table = Self::load_yaml::<RateTable>(&path)?;
                debug!(
                    file = %path.display(),
                    scheme = %table.scheme,
                    effective_date = %table.effective_date,
                    "Parsed rate table"
                );
                tables.push(table);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(tables)
    }

    /// Returns the underlying statutory configuration.
    pub fn config(&self) -> &StatutoryConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }
}
