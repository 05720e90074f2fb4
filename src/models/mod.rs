//! Core data models for the statutory contribution engine.
//!
//! This module contains the scheme identifiers and the breakdown types the
//! engine produces.

mod breakdown;
mod scheme;

pub use breakdown::{
    AuditStep, AuditTrace, AuditWarning, ContributionResult, PayrollBreakdown,
};
pub use scheme::SchemeId;
