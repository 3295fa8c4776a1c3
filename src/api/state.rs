//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, ModelCatalog, Run, RunId, Workflow};
use crate::infrastructure::services::{CreateWorkflowRequest, RunService, WorkflowService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub workflow_service: Arc<dyn WorkflowServiceTrait>,
    pub run_service: Arc<dyn RunServiceTrait>,
    pub catalog: Arc<ModelCatalog>,
}

/// Trait for workflow service operations
#[async_trait::async_trait]
pub trait WorkflowServiceTrait: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Workflow>, DomainError>;
    async fn list(&self) -> Result<Vec<Workflow>, DomainError>;
    async fn create(&self, request: CreateWorkflowRequest) -> Result<Workflow, DomainError>;
    async fn run(&self, id: &str) -> Result<Run, DomainError>;
}

/// Trait for run history operations
#[async_trait::async_trait]
pub trait RunServiceTrait: Send + Sync {
    async fn list_ids(&self) -> Result<Vec<RunId>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<Run>, DomainError>;
}

#[async_trait::async_trait]
impl WorkflowServiceTrait for WorkflowService {
    async fn get(&self, id: &str) -> Result<Option<Workflow>, DomainError> {
        WorkflowService::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<Workflow>, DomainError> {
        WorkflowService::list(self).await
    }

    async fn create(&self, request: CreateWorkflowRequest) -> Result<Workflow, DomainError> {
        WorkflowService::create(self, request).await
    }

    async fn run(&self, id: &str) -> Result<Run, DomainError> {
        WorkflowService::run(self, id).await
    }
}

#[async_trait::async_trait]
impl RunServiceTrait for RunService {
    async fn list_ids(&self) -> Result<Vec<RunId>, DomainError> {
        RunService::list_ids(self).await
    }

    async fn get(&self, id: &str) -> Result<Option<Run>, DomainError> {
        RunService::get(self, id).await
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        workflow_service: Arc<dyn WorkflowServiceTrait>,
        run_service: Arc<dyn RunServiceTrait>,
        catalog: ModelCatalog,
    ) -> Self {
        Self {
            workflow_service,
            run_service,
            catalog: Arc::new(catalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::ScriptedInvoker;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::workflow::WorkflowExecutorImpl;

    #[test]
    fn test_debug_shows_catalog() {
        let runs = Arc::new(InMemoryStorage::<Run>::new());
        let catalog = ModelCatalog::new(["m1"]);
        let workflow_service = WorkflowService::new(
            Arc::new(InMemoryStorage::<Workflow>::new()),
            runs.clone(),
            Arc::new(WorkflowExecutorImpl::new(Arc::new(ScriptedInvoker::new()))),
            catalog.clone(),
        );
        let state = AppState::new(
            Arc::new(workflow_service),
            Arc::new(RunService::new(runs)),
            catalog,
        );

        let debug = format!("{:?}", state);
        assert!(debug.starts_with("AppState"));
        assert!(debug.contains("m1"));
    }
}
