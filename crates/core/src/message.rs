//! Calculation messages and the severity protocol.
//!
//! Every domain condition a handler observes becomes a `CalculationMessage`
//! with a stable code. CRITICAL halts evaluation and marks the calculation
//! FAILURE; WARNING is recorded and evaluation continues.

use serde::{Deserialize, Serialize};

/// Stable message codes the external test suite relies on.
pub mod code {
    pub const DOSSIER_ALREADY_EXISTS: &str = "DOSSIER_ALREADY_EXISTS";
    pub const INVALID_NAME: &str = "INVALID_NAME";
    pub const INVALID_BIRTH_DATE: &str = "INVALID_BIRTH_DATE";
    pub const DOSSIER_NOT_FOUND: &str = "DOSSIER_NOT_FOUND";
    pub const INVALID_SALARY: &str = "INVALID_SALARY";
    pub const INVALID_PART_TIME_FACTOR: &str = "INVALID_PART_TIME_FACTOR";
    pub const DUPLICATE_POLICY: &str = "DUPLICATE_POLICY";
    pub const NO_POLICIES: &str = "NO_POLICIES";
    pub const NO_MATCHING_POLICIES: &str = "NO_MATCHING_POLICIES";
    pub const NEGATIVE_SALARY_CLAMPED: &str = "NEGATIVE_SALARY_CLAMPED";
    pub const NO_PARTICIPANT: &str = "NO_PARTICIPANT";
    pub const RETIREMENT_BEFORE_EMPLOYMENT: &str = "RETIREMENT_BEFORE_EMPLOYMENT";
    pub const NOT_ELIGIBLE: &str = "NOT_ELIGIBLE";
    pub const UNKNOWN_MUTATION: &str = "UNKNOWN_MUTATION";
}

/// Message severity. CRITICAL halts the evaluation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Warning,
}

/// A structured record emitted by a mutation handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationMessage {
    pub code: String,
    pub severity: Severity,
    pub message: String,
}

impl CalculationMessage {
    pub fn critical(code: &str, message: impl Into<String>) -> Self {
        CalculationMessage {
            code: code.to_string(),
            severity: Severity::Critical,
            message: message.into(),
        }
    }

    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        CalculationMessage {
            code: code.to_string(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}
