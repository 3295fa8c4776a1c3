//! Workflow error types

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur while defining or looking up workflows
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Workflow not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Workflow has no steps: {0}")]
    EmptyWorkflow(String),

    #[error("Invalid workflow ID '{0}'")]
    InvalidId(String),
}

impl WorkflowError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn empty_workflow(name: impl Into<String>) -> Self {
        Self::EmptyWorkflow(name.into())
    }

    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }
}

impl From<WorkflowError> for DomainError {
    fn from(err: WorkflowError) -> Self {
        match err {
            // A malformed ID can never name a stored workflow
            WorkflowError::NotFound(_) | WorkflowError::InvalidId(_) => {
                DomainError::not_found(err.to_string())
            }
            WorkflowError::Validation(message) => DomainError::validation(message),
            WorkflowError::EmptyWorkflow(_) => DomainError::validation(err.to_string()),
        }
    }
}
