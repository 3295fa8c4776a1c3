//! Workflow endpoints

use axum::extract::{Path, State};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreateWorkflowBody, Json, RunStartedResponse, WorkflowResponse,
};
use crate::domain::Step;
use crate::infrastructure::services::CreateWorkflowRequest;

/// POST /workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(body): Json<CreateWorkflowBody>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    debug!(name = %body.name, steps = body.steps.len(), "Creating workflow");

    let steps: Vec<Step> = body.steps.into_iter().map(Step::from).collect();
    let request = CreateWorkflowRequest::new(body.name).with_steps(steps);

    let workflow = state.workflow_service.create(request).await?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// GET /workflows
pub async fn list_workflows(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkflowResponse>>, ApiError> {
    let workflows = state.workflow_service.list().await?;

    Ok(Json(workflows.iter().map(WorkflowResponse::from).collect()))
}

/// GET /workflows/{id}
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let workflow = state
        .workflow_service
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Workflow not found"))?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// POST /workflows/{id}/run
///
/// Executes synchronously; the response carries the terminal status.
pub async fn run_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunStartedResponse>, ApiError> {
    info!(workflow_id = %id, "Run requested");

    let run = state.workflow_service.run(&id).await?;

    Ok(Json(RunStartedResponse::from(&run)))
}
