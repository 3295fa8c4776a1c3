//! Workflow domain entity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::WorkflowError;
use crate::domain::model::ModelId;
use crate::domain::storage::{StorageEntity, StorageKey};

/// Workflow identifier, a hyphenated UUID v4 assigned at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkflowId(String);

impl WorkflowId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier received from a client
    pub fn new(id: impl Into<String>) -> Result<Self, WorkflowError> {
        let id = id.into();

        match Uuid::parse_str(&id) {
            Ok(uuid) => Ok(Self(uuid.hyphenated().to_string())),
            Err(_) => Err(WorkflowError::invalid_id(id)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkflowId {
    type Error = WorkflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkflowId> for String {
    fn from(id: WorkflowId) -> Self {
        id.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for WorkflowId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// One model invocation within a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Model to invoke, must be part of the model catalog
    pub model: ModelId,

    /// Prompt sent verbatim on every attempt
    #[serde(default)]
    pub prompt: String,

    /// Criterion the output must satisfy, empty means always pass
    #[serde(default)]
    pub completion_criteria: String,
}

impl Step {
    pub fn new(
        model: impl Into<ModelId>,
        prompt: impl Into<String>,
        completion_criteria: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            completion_criteria: completion_criteria.into(),
        }
    }
}

/// A named, ordered list of steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    id: WorkflowId,
    name: String,
    steps: Vec<Step>,
    created_at: DateTime<Utc>,
}

impl Workflow {
    /// Create a workflow with a fresh identifier.
    ///
    /// The name must contain a non-whitespace character and at least one
    /// step is required. Model names are checked against the catalog by the
    /// caller, since the catalog is configuration rather than domain data.
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Result<Self, WorkflowError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(WorkflowError::validation("Workflow name cannot be empty"));
        }

        if steps.is_empty() {
            return Err(WorkflowError::empty_workflow(name));
        }

        Ok(Self {
            id: WorkflowId::generate(),
            name,
            steps,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &WorkflowId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl StorageEntity for Workflow {
    type Key = WorkflowId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_step() -> Step {
        Step::new("m1", "say hi", "contains:hi")
    }

    #[test]
    fn test_workflow_id_generate_is_parseable() {
        let id = WorkflowId::generate();
        let parsed = WorkflowId::new(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_workflow_id_rejects_non_uuid() {
        assert!(WorkflowId::new("").is_err());
        assert!(WorkflowId::new("my-workflow").is_err());
        assert_eq!(
            WorkflowId::new("nope").unwrap_err(),
            WorkflowError::invalid_id("nope")
        );
    }

    #[test]
    fn test_workflow_id_normalizes_case() {
        let id = WorkflowId::new("6F9619FF-8B86-4011-B42D-00C04FC964FF").unwrap();
        assert_eq!(id.as_str(), "6f9619ff-8b86-4011-b42d-00c04fc964ff");
    }

    #[test]
    fn test_workflow_creation() {
        let workflow = Workflow::new("Echo Test", vec![echo_step()]).unwrap();

        assert_eq!(workflow.name(), "Echo Test");
        assert_eq!(workflow.step_count(), 1);
        assert_eq!(workflow.steps()[0].prompt, "say hi");
        assert_eq!(workflow.key(), workflow.id());
    }

    #[test]
    fn test_workflow_requires_name() {
        let err = Workflow::new("   ", vec![echo_step()]).unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[test]
    fn test_workflow_requires_steps() {
        let err = Workflow::new("Empty", vec![]).unwrap_err();
        assert_eq!(err, WorkflowError::empty_workflow("Empty"));
    }

    #[test]
    fn test_workflows_get_distinct_ids() {
        let a = Workflow::new("A", vec![echo_step()]).unwrap();
        let b = Workflow::new("A", vec![echo_step()]).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_step_wire_format() {
        let step: Step = serde_json::from_str(r#"{"model": "m1"}"#).unwrap();
        assert_eq!(step, Step::new("m1", "", ""));

        let json = serde_json::to_value(echo_step()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m1",
                "prompt": "say hi",
                "completion_criteria": "contains:hi"
            })
        );
    }

    #[test]
    fn test_workflow_serialization_roundtrip_keeps_step_order() {
        let workflow = Workflow::new(
            "Ordered",
            vec![
                Step::new("m1", "first", ""),
                Step::new("m1", "second", "json"),
                Step::new("m1", "third", "code"),
            ],
        )
        .unwrap();

        let json = serde_json::to_string(&workflow).unwrap();
        let back: Workflow = serde_json::from_str(&json).unwrap();

        let prompts: Vec<&str> = back.steps().iter().map(|s| s.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["first", "second", "third"]);
        assert_eq!(back.id(), workflow.id());
    }
}
