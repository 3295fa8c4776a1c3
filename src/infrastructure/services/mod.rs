//! Infrastructure services

mod run_service;
mod workflow_service;

pub use run_service::RunService;
pub use workflow_service::{CreateWorkflowRequest, WorkflowService};
