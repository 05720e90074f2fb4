//! Statutory payroll contribution engine for Kenya
//!
//! This crate computes PAYE, SHIF, NSSF and the Housing Levy for a gross
//! monthly salary from versioned, date-effective rate tables, and exposes
//! the calculation over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
