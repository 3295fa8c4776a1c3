//! Model catalog endpoint

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{Json, ModelsResponse};

/// GET /models
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let models = state
        .catalog
        .models()
        .iter()
        .map(|m| m.as_str().to_string())
        .collect();

    Json(ModelsResponse { models })
}
