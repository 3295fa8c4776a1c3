//! Run service - read access to the run history

use std::sync::Arc;

use crate::domain::storage::Storage;
use crate::domain::{DomainError, Run, RunId};

/// Exposes finished runs, newest first
pub struct RunService {
    storage: Arc<dyn Storage<Run>>,
}

impl std::fmt::Debug for RunService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunService").finish()
    }
}

impl RunService {
    pub fn new(storage: Arc<dyn Storage<Run>>) -> Self {
        Self { storage }
    }

    /// All run IDs, most recent first
    pub async fn list_ids(&self) -> Result<Vec<RunId>, DomainError> {
        let runs = self.storage.list().await?;
        Ok(runs.into_iter().rev().map(|run| run.id().clone()).collect())
    }

    /// Get a run by ID, malformed IDs are simply unknown
    pub async fn get(&self, id: &str) -> Result<Option<Run>, DomainError> {
        match RunId::new(id) {
            Ok(run_id) => self.storage.get(&run_id).await,
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockStorage;
    use crate::domain::{StepLog, WorkflowId};
    use crate::infrastructure::storage::InMemoryStorage;

    fn finished_run() -> Run {
        let mut run = Run::start(WorkflowId::generate());
        run.record_step(StepLog::passed(0, "hi", 0)).unwrap();
        run.finish().unwrap();
        run
    }

    #[tokio::test]
    async fn test_list_ids_newest_first() {
        let storage = Arc::new(InMemoryStorage::<Run>::new());
        let service = RunService::new(storage.clone());

        let older = storage.create(finished_run()).await.unwrap();
        let newer = storage.create(finished_run()).await.unwrap();

        let ids = service.list_ids().await.unwrap();
        assert_eq!(ids, vec![newer.id().clone(), older.id().clone()]);
    }

    #[tokio::test]
    async fn test_list_ids_empty() {
        let service = RunService::new(Arc::new(InMemoryStorage::<Run>::new()));
        assert!(service.list_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_run() {
        let run = finished_run();
        let service = RunService::new(Arc::new(MockStorage::new().with_entity(run.clone())));

        let found = service.get(run.id().as_str()).await.unwrap().unwrap();
        assert_eq!(found.history(), run.history());

        assert!(service.get("run-unknown").await.unwrap().is_none());
        assert!(service
            .get(RunId::generate().as_str())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let service = RunService::new(Arc::new(MockStorage::<Run>::new().with_error("boom")));
        assert!(service.list_ids().await.is_err());
    }
}
