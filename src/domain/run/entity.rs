//! Run domain entities

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::RunError;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::workflow::WorkflowId;

/// Regex pattern for valid run IDs: run-{uuid}
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^run-[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$").unwrap()
});

/// Validated run identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Result<Self, RunError> {
        let id = id.into();

        if !ID_PATTERN.is_match(&id) {
            return Err(RunError::invalid_id(id));
        }

        Ok(Self(id))
    }

    pub fn generate() -> Self {
        Self(format!("run-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RunId {
    type Error = RunError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RunId> for String {
    fn from(id: RunId) -> Self {
        id.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for RunId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Status of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Steps are still being executed
    #[default]
    Running,

    /// Every step satisfied its completion criterion
    Completed,

    /// At least one step exhausted its attempts
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of a single step within a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLog {
    /// Zero-based position of the step in its workflow
    pub step_index: usize,

    /// Prompt sent to the model
    #[serde(default)]
    pub input_prompt: String,

    /// Final model output, or the last text seen if the step never passed
    pub llm_output: String,

    /// Whether the completion criterion was satisfied
    pub passed_criteria: bool,

    /// Attempts made beyond the first
    pub retry_count: u32,

    /// Why the step did not pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Wall-clock time spent on the step, retries included
    #[serde(default)]
    pub execution_time_ms: u64,
}

impl StepLog {
    pub fn passed(step_index: usize, llm_output: impl Into<String>, retry_count: u32) -> Self {
        Self {
            step_index,
            input_prompt: String::new(),
            llm_output: llm_output.into(),
            passed_criteria: true,
            retry_count,
            error: None,
            execution_time_ms: 0,
        }
    }

    pub fn failed(
        step_index: usize,
        llm_output: impl Into<String>,
        retry_count: u32,
        error: impl Into<String>,
    ) -> Self {
        Self {
            step_index,
            input_prompt: String::new(),
            llm_output: llm_output.into(),
            passed_criteria: false,
            retry_count,
            error: Some(error.into()),
            execution_time_ms: 0,
        }
    }

    pub fn with_input_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.input_prompt = prompt.into();
        self
    }

    pub fn with_execution_time(mut self, execution_time_ms: u64) -> Self {
        self.execution_time_ms = execution_time_ms;
        self
    }
}

/// One execution of a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    run_id: RunId,
    workflow_id: WorkflowId,
    status: RunStatus,
    history: Vec<StepLog>,
    started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
}

impl Run {
    /// Start a new run for the given workflow
    pub fn start(workflow_id: WorkflowId) -> Self {
        Self {
            run_id: RunId::generate(),
            workflow_id,
            status: RunStatus::Running,
            history: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn id(&self) -> &RunId {
        &self.run_id
    }

    pub fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn history(&self) -> &[StepLog] {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Append the log of the next step.
    ///
    /// Logs must arrive in workflow order, and only while the run is running.
    pub fn record_step(&mut self, log: StepLog) -> Result<(), RunError> {
        if self.status.is_terminal() {
            return Err(RunError::AlreadyFinished {
                run_id: self.run_id.to_string(),
                status: self.status.to_string(),
            });
        }

        let expected = self.history.len();
        if log.step_index != expected {
            return Err(RunError::OutOfOrder {
                run_id: self.run_id.to_string(),
                expected,
                actual: log.step_index,
            });
        }

        self.history.push(log);
        Ok(())
    }

    /// Close the run, deriving its terminal status from the history
    pub fn finish(&mut self) -> Result<RunStatus, RunError> {
        if self.status.is_terminal() {
            return Err(RunError::AlreadyFinished {
                run_id: self.run_id.to_string(),
                status: self.status.to_string(),
            });
        }

        self.status = if self.history.iter().all(|log| log.passed_criteria) {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
        self.finished_at = Some(Utc::now());

        Ok(self.status)
    }
}

impl StorageEntity for Run {
    type Key = RunId;

    fn key(&self) -> &Self::Key {
        &self.run_id
    }
}
