//! LLM Workflow Engine
//!
//! Runs named workflows made of ordered LLM steps. Each step sends its prompt
//! to a model and is retried until the output satisfies the step's completion
//! criterion or the attempt budget is spent. A failed step is recorded and
//! later steps still run; the run then ends as `failed`.
//!
//! ```
//! use llm_workflow_engine::domain::evaluate;
//!
//! assert!(evaluate("The answer is 42", "contains:42"));
//! assert!(evaluate("  {\"ok\": true}  ", "json"));
//! assert!(!evaluate("no fences here", "code"));
//! ```
//!
//! Finished runs are kept in the run history, newest first:
//!
//! ```
//! # tokio_test::block_on(async {
//! use std::sync::Arc;
//! use llm_workflow_engine::domain::{Run, StepLog, Storage, WorkflowId};
//! use llm_workflow_engine::infrastructure::services::RunService;
//! use llm_workflow_engine::infrastructure::storage::InMemoryStorage;
//!
//! let runs = Arc::new(InMemoryStorage::<Run>::new());
//! let mut run = Run::start(WorkflowId::generate());
//! run.record_step(StepLog::passed(0, "hi", 0)).unwrap();
//! run.finish().unwrap();
//! let run = runs.create(run).await.unwrap();
//!
//! let service = RunService::new(runs);
//! assert_eq!(service.list_ids().await.unwrap(), vec![run.id().clone()]);
//! # });
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::{Run, Workflow};
use infrastructure::llm::{HttpClient, LlmModelInvoker, OpenAiProvider, SamplingParams};
use infrastructure::services::{RunService, WorkflowService};
use infrastructure::storage::InMemoryStorage;
use infrastructure::workflow::WorkflowExecutorImpl;

/// Wire storage, the model gateway and services from configuration
///
/// Fails when no provider API key is configured.
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let api_key = config.provider.require_api_key()?;
    let policy = config.engine.retry_policy();
    let catalog = config.provider.catalog();

    let client = HttpClient::with_timeout(policy.attempt_timeout())?;
    let provider = match config.provider.base_url.as_deref() {
        Some(base_url) if !base_url.trim().is_empty() => {
            OpenAiProvider::with_base_url(client, api_key, base_url)
        }
        _ => OpenAiProvider::new(client, api_key),
    };

    let invoker = LlmModelInvoker::new(Arc::new(provider), catalog.clone()).with_sampling(
        SamplingParams {
            temperature: config.provider.temperature,
            max_tokens: config.provider.max_tokens,
        },
    );
    let executor = WorkflowExecutorImpl::with_policy(Arc::new(invoker), policy);

    let workflows = Arc::new(InMemoryStorage::<Workflow>::new());
    let runs = Arc::new(InMemoryStorage::<Run>::new());

    let workflow_service =
        WorkflowService::new(workflows, runs.clone(), Arc::new(executor), catalog.clone());
    let run_service = RunService::new(runs);

    info!(models = catalog.models().len(), "Application state initialized");

    Ok(AppState::new(
        Arc::new(workflow_service),
        Arc::new(run_service),
        catalog,
    ))
}
