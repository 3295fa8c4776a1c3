//! Request and response bodies for workflow and execution endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Run, RunStatus, Step, StepLog, Workflow};

/// A step as sent and returned over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepBody {
    pub model: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub completion_criteria: String,
}

impl From<StepBody> for Step {
    fn from(body: StepBody) -> Self {
        Step::new(body.model, body.prompt, body.completion_criteria)
    }
}

impl From<&Step> for StepBody {
    fn from(step: &Step) -> Self {
        Self {
            model: step.model.to_string(),
            prompt: step.prompt.clone(),
            completion_criteria: step.completion_criteria.clone(),
        }
    }
}

/// Body of `POST /workflows`
///
/// Missing fields default to empty so they fail domain validation with a 400
/// instead of a deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflowBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<StepBody>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResponse {
    pub id: String,
    pub name: String,
    pub steps: Vec<StepBody>,
    pub created_at: DateTime<Utc>,
}

impl From<&Workflow> for WorkflowResponse {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id().to_string(),
            name: workflow.name().to_string(),
            steps: workflow.steps().iter().map(StepBody::from).collect(),
            created_at: workflow.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunStartedResponse {
    pub run_id: String,
    pub status: RunStatus,
}

impl From<&Run> for RunStartedResponse {
    fn from(run: &Run) -> Self {
        Self {
            run_id: run.id().to_string(),
            status: run.status(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionsListResponse {
    pub run_ids: Vec<String>,
}

/// Body of `GET /executions/{run_id}`; only `history` is present for unknown runs
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionHistoryResponse {
    pub history: Vec<StepLog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExecutionHistoryResponse {
    pub fn empty() -> Self {
        Self {
            history: Vec::new(),
            run_id: None,
            workflow_id: None,
            status: None,
            started_at: None,
            finished_at: None,
        }
    }
}

impl From<Run> for ExecutionHistoryResponse {
    fn from(run: Run) -> Self {
        Self {
            run_id: Some(run.id().to_string()),
            workflow_id: Some(run.workflow_id().to_string()),
            status: Some(run.status()),
            started_at: Some(run.started_at()),
            finished_at: run.finished_at(),
            history: run.history().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}
