//! Core error types

use thiserror::Error;

use crate::types::CaseStatus;

/// Core domain error
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid case status transition
    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: CaseStatus, to: CaseStatus },

    /// Invalid field value
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown enumeration value when parsing external input
    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;
