//! Run history endpoints

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ExecutionHistoryResponse, ExecutionsListResponse, Json};

/// GET /executions
pub async fn list_executions(
    State(state): State<AppState>,
) -> Result<Json<ExecutionsListResponse>, ApiError> {
    let run_ids = state
        .run_service
        .list_ids()
        .await?
        .into_iter()
        .map(String::from)
        .collect();

    Ok(Json(ExecutionsListResponse { run_ids }))
}

/// GET /executions/{run_id}
///
/// Unknown runs yield an empty history rather than a 404.
pub async fn get_execution(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Result<Json<ExecutionHistoryResponse>, ApiError> {
    let response = match state.run_service.get(&run_id).await? {
        Some(run) => ExecutionHistoryResponse::from(run),
        None => ExecutionHistoryResponse::empty(),
    };

    Ok(Json(response))
}
