//! Wire types shared by the HTTP handlers

pub mod error;
pub mod json;
pub mod workflow;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use workflow::{
    CreateWorkflowBody, ExecutionHistoryResponse, ExecutionsListResponse, ModelsResponse,
    RunStartedResponse, StepBody, WorkflowResponse,
};
