//! Request types for the statutory contribution API.
//!
//! This module defines the JSON request structures for the `/calculate`,
//! `/calculate/batch` and `/rate-tables` endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Request body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Caller's identifier for the employee, echoed back in the response.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Gross monthly salary in KES.
    pub gross_salary: Decimal,
    /// The date whose rate tables apply.
    #[serde(default)]
    pub as_of_date: Option<NaiveDate>,
}

impl CalculationRequest {
    /// Returns the as-of date, which every calculation requires.
    ///
    /// The engine never falls back to the current date; a breakdown must be
    /// reproducible from the request alone.
    pub fn as_of_date(&self) -> EngineResult<NaiveDate> {
        self.as_of_date.ok_or_else(|| {
            EngineError::invalid_input("as_of_date", "an as-of date is required")
        })
    }
}

/// Request body for the `/calculate/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCalculationRequest {
    /// The date whose rate tables apply to every employee in the batch.
    pub as_of_date: NaiveDate,
    /// The salaries to calculate.
    pub employees: Vec<EmployeeSalaryRequest>,
}

/// One employee's salary in a batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSalaryRequest {
    /// Caller's identifier for the employee.
    pub employee_id: String,
    /// Gross monthly salary in KES.
    pub gross_salary: Decimal,
}

/// Query parameters for the `/rate-tables` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTablesQuery {
    /// The date to list the tables in force for.
    pub as_of_date: NaiveDate,
}
