//! Workflow executor implementation

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info};

use super::step_runner::StepRunner;
use crate::domain::{ModelInvoker, RetryPolicy, Run, Workflow, WorkflowExecutor};

/// Executes steps one after another, each under the shared retry policy
#[derive(Debug)]
pub struct WorkflowExecutorImpl {
    runner: StepRunner,
}

impl WorkflowExecutorImpl {
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self::with_policy(invoker, RetryPolicy::default())
    }

    pub fn with_policy(invoker: Arc<dyn ModelInvoker>, policy: RetryPolicy) -> Self {
        Self {
            runner: StepRunner::new(invoker, policy),
        }
    }
}

#[async_trait]
impl WorkflowExecutor for WorkflowExecutorImpl {
    async fn execute(&self, workflow: &Workflow) -> Run {
        let start = Instant::now();
        let mut run = Run::start(workflow.id().clone());

        info!(
            workflow_id = %workflow.id(),
            run_id = %run.id(),
            steps = workflow.step_count(),
            "Executing workflow"
        );

        for (step_index, step) in workflow.steps().iter().enumerate() {
            let log = self.runner.run(step_index, step).await;

            let recorded = run.record_step(log);
            if let Err(e) = &recorded {
                error!(run_id = %run.id(), step_index, error = %e, "Failed to record step");
            }
            debug_assert!(recorded.is_ok(), "step {} was not recorded", step_index);
        }
        debug_assert_eq!(run.history().len(), workflow.step_count());

        match run.finish() {
            Ok(status) => info!(
                workflow_id = %workflow.id(),
                run_id = %run.id(),
                status = %status,
                execution_time_ms = start.elapsed().as_millis() as u64,
                "Workflow run finished"
            ),
            Err(e) => error!(run_id = %run.id(), error = %e, "Failed to finish run"),
        }

        run
    }
}
