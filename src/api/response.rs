//! Response types for the statutory contribution API.
//!
//! This module defines the success envelopes and the error response
//! structures and error handling for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{JurisdictionMetadata, RateTable};
use crate::error::EngineError;
use crate::models::PayrollBreakdown;

/// Response body for a successful `/calculate` request.
///
/// The breakdown itself is deterministic; the identifiers and timestamp
/// that make each response unique live in this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// The employee identifier from the request, if one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// The statutory breakdown.
    pub breakdown: PayrollBreakdown,
}

impl CalculationResponse {
    /// Wraps a breakdown in a fresh response envelope.
    pub fn new(employee_id: Option<String>, breakdown: PayrollBreakdown) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            employee_id,
            breakdown,
        }
    }
}

/// Response body for `/calculate/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCalculationResponse {
    /// Unique identifier for this batch.
    pub batch_id: Uuid,
    /// When the batch was processed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the results.
    pub engine_version: String,
    /// The date whose rate tables were applied.
    pub as_of_date: NaiveDate,
    /// One entry per employee, in request order.
    pub results: Vec<BatchEmployeeResult>,
    /// Number of employees calculated successfully.
    pub succeeded: usize,
    /// Number of employees whose calculation failed.
    pub failed: usize,
    /// Sum of net pay over the successful employees.
    pub total_net_pay: Decimal,
    /// Sum of employer contributions over the successful employees.
    pub total_employer_contributions: Decimal,
}

/// The outcome for one employee in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmployeeResult {
    /// The employee identifier from the request.
    pub employee_id: String,
    /// The breakdown, when the calculation succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PayrollBreakdown>,
    /// The error, when the calculation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Response body for `/rate-tables`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTablesResponse {
    /// The jurisdiction the tables belong to.
    pub jurisdiction: JurisdictionMetadata,
    /// The date the tables were resolved for.
    pub as_of_date: NaiveDate,
    /// The tables in force on that date, in evaluation order.
    pub tables: Vec<RateTable>,
}

/// API error response structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid input '{}': {}", field, message),
                    field,
                ),
            },
            EngineError::MisconfiguredRateTable { scheme, reason } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "MISCONFIGURED_RATE_TABLE",
                    format!("Rate table for {} is misconfigured", scheme.display_name()),
                    reason,
                ),
            },
        }
    }
}
