//! Run-specific errors

use thiserror::Error;

use crate::domain::DomainError;

/// Errors raised when a run record would break its invariants
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("Invalid run ID '{0}': must be in format run-{{uuid}}")]
    InvalidId(String),

    #[error("Run {run_id} is already {status}")]
    AlreadyFinished { run_id: String, status: String },

    #[error("Step log out of order for run {run_id}: expected index {expected}, got {actual}")]
    OutOfOrder {
        run_id: String,
        expected: usize,
        actual: usize,
    },
}

impl RunError {
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }
}

impl From<RunError> for DomainError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::InvalidId(_) => DomainError::not_found(err.to_string()),
            _ => DomainError::internal(err.to_string()),
        }
    }
}
