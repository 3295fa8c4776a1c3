//! Run command - executes one workflow definition file and prints the run

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{CreateWorkflowBody, ExecutionHistoryResponse};
use crate::config::AppConfig;
use crate::domain::Step;
use crate::infrastructure::logging;
use crate::infrastructure::services::CreateWorkflowRequest;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to a JSON workflow definition (`{"name": ..., "steps": [...]}`)
    pub file: PathBuf,

    /// Print the run as single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Execute the workflow in `args.file` and write the run to stdout
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let definition = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let state = crate::create_app_state_with_config(&config)?;
    let response = execute(&state, &definition).await?;

    let output = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{}", output);

    Ok(())
}

/// Define the workflow, run it once and return its history
pub async fn execute(state: &AppState, definition: &str) -> anyhow::Result<ExecutionHistoryResponse> {
    let body: CreateWorkflowBody =
        serde_json::from_str(definition).context("Invalid workflow definition")?;

    let steps: Vec<Step> = body.steps.into_iter().map(Step::from).collect();
    let request = CreateWorkflowRequest::new(body.name).with_steps(steps);

    let workflow = state.workflow_service.create(request).await?;
    let run = state.workflow_service.run(workflow.id().as_str()).await?;

    info!(
        run_id = %run.id(),
        status = %run.status(),
        steps = run.history().len(),
        "Run finished"
    );

    Ok(ExecutionHistoryResponse::from(run))
}
