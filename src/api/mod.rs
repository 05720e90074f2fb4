//! HTTP API module for the statutory contribution engine.
//!
//! This module provides the REST endpoints for calculating statutory
//! deductions and listing the rate tables in force.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BatchCalculationRequest, CalculationRequest, EmployeeSalaryRequest, RateTablesQuery,
};
pub use response::{
    ApiError, ApiErrorResponse, BatchCalculationResponse, BatchEmployeeResult,
    CalculationResponse, RateTablesResponse,
};
pub use state::AppState;
