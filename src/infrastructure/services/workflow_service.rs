//! Workflow service - definition, lookup and execution of workflows

use std::sync::Arc;

use tracing::info;

use crate::domain::storage::Storage;
use crate::domain::{
    DomainError, ModelCatalog, Run, Step, Workflow, WorkflowExecutor, WorkflowId,
};

/// Request to create a new workflow
#[derive(Debug, Clone)]
pub struct CreateWorkflowRequest {
    pub name: String,
    pub steps: Vec<Step>,
}

impl CreateWorkflowRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }
}

/// Workflow service for creating, listing and running workflows
pub struct WorkflowService {
    storage: Arc<dyn Storage<Workflow>>,
    runs: Arc<dyn Storage<Run>>,
    executor: Arc<dyn WorkflowExecutor>,
    catalog: ModelCatalog,
}

impl std::fmt::Debug for WorkflowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowService")
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl WorkflowService {
    pub fn new(
        storage: Arc<dyn Storage<Workflow>>,
        runs: Arc<dyn Storage<Run>>,
        executor: Arc<dyn WorkflowExecutor>,
        catalog: ModelCatalog,
    ) -> Self {
        Self {
            storage,
            runs,
            executor,
            catalog,
        }
    }

    /// Get a workflow by ID, malformed IDs are simply unknown
    pub async fn get(&self, id: &str) -> Result<Option<Workflow>, DomainError> {
        match WorkflowId::new(id) {
            Ok(workflow_id) => self.storage.get(&workflow_id).await,
            Err(_) => Ok(None),
        }
    }

    /// List all workflows in creation order
    pub async fn list(&self) -> Result<Vec<Workflow>, DomainError> {
        self.storage.list().await
    }

    /// Validate and store a new workflow
    pub async fn create(&self, request: CreateWorkflowRequest) -> Result<Workflow, DomainError> {
        for step in &request.steps {
            self.catalog.validate(&step.model)?;
        }

        let workflow = Workflow::new(request.name, request.steps)?;
        let workflow = self.storage.create(workflow).await?;

        info!(
            workflow_id = %workflow.id(),
            name = workflow.name(),
            steps = workflow.step_count(),
            "Workflow created"
        );

        Ok(workflow)
    }

    /// Execute a stored workflow and persist the finished run
    pub async fn run(&self, id: &str) -> Result<Run, DomainError> {
        let workflow = self
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Workflow not found"))?;

        let run = self.executor.execute(&workflow).await;
        self.runs.create(run).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::ScriptedInvoker;
    use crate::domain::storage::mock::MockStorage;
    use crate::domain::{RetryPolicy, RunStatus};
    use crate::infrastructure::services::RunService;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::workflow::WorkflowExecutorImpl;
    use std::time::Duration;

    struct Fixture {
        service: WorkflowService,
        runs: Arc<InMemoryStorage<Run>>,
    }

    fn fixture(invoker: ScriptedInvoker) -> Fixture {
        let runs = Arc::new(InMemoryStorage::<Run>::new());
        let executor = WorkflowExecutorImpl::with_policy(
            Arc::new(invoker),
            RetryPolicy::new(3).with_initial_delay(0),
        );

        let service = WorkflowService::new(
            Arc::new(InMemoryStorage::<Workflow>::new()),
            runs.clone(),
            Arc::new(executor),
            ModelCatalog::new(["m1", "m2"]),
        );

        Fixture { service, runs }
    }

    fn echo_request() -> CreateWorkflowRequest {
        CreateWorkflowRequest::new("Echo Test")
            .with_steps(vec![Step::new("m1", "say hi", "contains:hi")])
    }

    #[tokio::test]
    async fn test_create_and_get_workflow() {
        let Fixture { service, .. } = fixture(ScriptedInvoker::new());

        let workflow = service.create(echo_request()).await.unwrap();
        let found = service.get(workflow.id().as_str()).await.unwrap().unwrap();

        assert_eq!(found.name(), "Echo Test");
        assert_eq!(found.steps(), workflow.steps());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_model() {
        let Fixture { service, .. } = fixture(ScriptedInvoker::new());

        let request =
            CreateWorkflowRequest::new("Bad").with_steps(vec![Step::new("nope", "p", "")]);
        let err = service.create(request).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("nope"));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_definitions() {
        let Fixture { service, .. } = fixture(ScriptedInvoker::new());

        let no_steps = service.create(CreateWorkflowRequest::new("Empty")).await;
        let blank_name = service
            .create(CreateWorkflowRequest::new("  ").with_steps(vec![Step::new("m1", "p", "")]))
            .await;

        assert!(matches!(no_steps, Err(DomainError::Validation { .. })));
        assert!(matches!(blank_name, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let Fixture { service, .. } = fixture(ScriptedInvoker::new());

        for name in ["first", "second", "third"] {
            service
                .create(CreateWorkflowRequest::new(name).with_steps(vec![Step::new("m2", "p", "")]))
                .await
                .unwrap();
        }

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .iter()
            .map(|w| w.name().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_get_unknown_or_malformed_id() {
        let Fixture { service, .. } = fixture(ScriptedInvoker::new());

        assert!(service.get("not-a-uuid").await.unwrap().is_none());
        assert!(service
            .get(WorkflowId::generate().as_str())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_run_persists_terminal_run() {
        let Fixture { service, runs } = fixture(ScriptedInvoker::new().with_reply("say hi", "hi"));
        let workflow = service.create(echo_request()).await.unwrap();

        let run = service.run(workflow.id().as_str()).await.unwrap();

        assert_eq!(run.status(), RunStatus::Completed);
        let stored = runs.get(run.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), RunStatus::Completed);
        assert_eq!(stored.history().len(), 1);
    }

    #[tokio::test]
    async fn test_each_run_gets_its_own_record() {
        let Fixture { service, runs } = fixture(ScriptedInvoker::new().with_reply("say hi", "hi"));
        let workflow = service.create(echo_request()).await.unwrap();

        let first = service.run(workflow.id().as_str()).await.unwrap();
        let second = service.run(workflow.id().as_str()).await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(runs.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_independent() {
        let Fixture { service, runs } = fixture(
            ScriptedInvoker::new()
                .with_reply("say hi", "hi")
                .with_delay(Duration::from_millis(50)),
        );
        let workflow = service
            .create(CreateWorkflowRequest::new("Pair").with_steps(vec![
                Step::new("m1", "say hi", "contains:hi"),
                Step::new("m2", "say hi", "contains:hi"),
            ]))
            .await
            .unwrap();
        let id = workflow.id().as_str();

        let (a, b) = tokio::join!(service.run(id), service.run(id));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.id(), b.id());
        for run in [&a, &b] {
            assert_eq!(run.status(), RunStatus::Completed);
            assert_eq!(run.history().len(), workflow.step_count());
            let indices: Vec<usize> = run.history().iter().map(|l| l.step_index).collect();
            assert_eq!(indices, vec![0, 1]);
        }

        let ids = RunService::new(runs).list_ids().await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(a.id()) && ids.contains(b.id()));
    }

    #[tokio::test]
    async fn test_run_unknown_workflow() {
        let Fixture { service, runs } = fixture(ScriptedInvoker::new());

        let err = service.run(WorkflowId::generate().as_str()).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(runs.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let service = WorkflowService::new(
            Arc::new(MockStorage::<Workflow>::new().with_error("disk on fire")),
            Arc::new(MockStorage::<Run>::new()),
            Arc::new(WorkflowExecutorImpl::new(Arc::new(ScriptedInvoker::new()))),
            ModelCatalog::new(["m1"]),
        );

        let err = service.list().await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
    }
}
