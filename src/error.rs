//! Error types for the statutory contribution engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine, its configuration loader and its callers
//! can observe.

use thiserror::Error;

use crate::models::SchemeId;

/// The main error type for the statutory contribution engine.
///
/// Input errors are recoverable by the caller (fix the input and retry).
/// Rate-table and configuration errors are not: they must be surfaced to an
/// administrator, and a breakdown is never returned alongside them.
///
/// # Example
///
/// ```
/// use payroll_ke::error::EngineError;
/// use payroll_ke::models::SchemeId;
///
/// let error = EngineError::MisconfiguredRateTable {
///     scheme: SchemeId::HousingLevy,
///     reason: "no rate table in force on 2023-01-01".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Misconfigured rate table for scheme 'housing_levy': no rate table in force on 2023-01-01"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The caller supplied an input the engine cannot compute with.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was rejected.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A scheme's rate table is missing for the requested date or violates
    /// the band invariants.
    #[error("Misconfigured rate table for scheme '{scheme}': {reason}")]
    MisconfiguredRateTable {
        /// The statutory scheme whose table is at fault.
        scheme: SchemeId,
        /// A description of the configuration defect.
        reason: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::MisconfiguredRateTable`].
    pub fn misconfigured(scheme: SchemeId, reason: impl Into<String>) -> Self {
        Self::MisconfiguredRateTable {
            scheme,
            reason: reason.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
