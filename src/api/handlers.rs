//! HTTP request handlers for the statutory contribution API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_payroll_breakdown;

use super::request::{BatchCalculationRequest, CalculationRequest, RateTablesQuery};
use super::response::{
    ApiError, ApiErrorResponse, BatchCalculationResponse, BatchEmployeeResult,
    CalculationResponse, RateTablesResponse,
};
use super::state::AppState;

/// The most employees a single `/calculate/batch` request may carry.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/calculate/batch", post(calculate_batch_handler))
        .route("/rate-tables", get(rate_tables_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON body rejection onto the API's error codes.
fn json_rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a gross salary and as-of date and returns the statutory breakdown.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_error(correlation_id, rejection).into_response(),
    };

    let as_of_date = match request.as_of_date() {
        Ok(date) => date,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Calculation rejected");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let start_time = Instant::now();
    match calculate_payroll_breakdown(request.gross_salary, as_of_date, state.config()) {
        Ok(breakdown) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = request.employee_id.as_deref().unwrap_or("-"),
                as_of_date = %as_of_date,
                net_pay = %breakdown.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(
                StatusCode::OK,
                CalculationResponse::new(request.employee_id, breakdown),
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /calculate/batch endpoint.
///
/// Every employee is calculated independently: one failure is reported in
/// that employee's entry and does not stop the rest of the batch.
async fn calculate_batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_error(correlation_id, rejection).into_response(),
    };

    if request.employees.len() > MAX_BATCH_SIZE {
        warn!(
            correlation_id = %correlation_id,
            employees = request.employees.len(),
            "Batch too large"
        );
        return ApiErrorResponse::bad_request(ApiError::validation_error(format!(
            "batch of {} employees exceeds the limit of {}",
            request.employees.len(),
            MAX_BATCH_SIZE
        )))
        .into_response();
    }

    let start_time = Instant::now();
    let as_of_date = request.as_of_date;
    let mut results = Vec::with_capacity(request.employees.len());
    let mut total_net_pay = Decimal::ZERO;
    let mut total_employer_contributions = Decimal::ZERO;
    let mut failed = 0;

    for employee in request.employees {
        match calculate_payroll_breakdown(employee.gross_salary, as_of_date, state.config()) {
            Ok(breakdown) => {
                total_net_pay += breakdown.net_pay;
                total_employer_contributions += breakdown.total_employer_contributions;
                results.push(BatchEmployeeResult {
                    employee_id: employee.employee_id,
                    breakdown: Some(breakdown),
                    error: None,
                });
            }
            Err(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    employee_id = %employee.employee_id,
                    error = %err,
                    "Batch entry failed"
                );
                failed += 1;
                let api_error: ApiErrorResponse = err.into();
                results.push(BatchEmployeeResult {
                    employee_id: employee.employee_id,
                    breakdown: None,
                    error: Some(api_error.error),
                });
            }
        }
    }

    let succeeded = results.len() - failed;
    info!(
        correlation_id = %correlation_id,
        as_of_date = %as_of_date,
        succeeded,
        failed,
        duration_us = start_time.elapsed().as_micros(),
        "Batch calculation completed"
    );

    json_response(
        StatusCode::OK,
        BatchCalculationResponse {
            batch_id: correlation_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            as_of_date,
            results,
            succeeded,
            failed,
            total_net_pay,
            total_employer_contributions,
        },
    )
}

/// Handler for GET /rate-tables endpoint.
///
/// Lists the rate tables in force on `as_of_date`.
async fn rate_tables_handler(
    State(state): State<AppState>,
    query: Result<Query<RateTablesQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Rate table query rejected"
            );
            return ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
                .into_response();
        }
    };

    let config = state.config().config();
    let tables: Vec<_> = config
        .tables_in_force(query.as_of_date)
        .into_iter()
        .cloned()
        .collect();

    info!(
        correlation_id = %correlation_id,
        as_of_date = %query.as_of_date,
        tables = tables.len(),
        "Listed rate tables"
    );

    json_response(
        StatusCode::OK,
        RateTablesResponse {
            jurisdiction: config.jurisdiction().clone(),
            as_of_date: query.as_of_date,
            tables,
        },
    )
}
