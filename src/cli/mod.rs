//! CLI module for the workflow engine
//!
//! - `serve`: HTTP API server
//! - `run`: execute a workflow definition file once and print its history

pub mod run;
pub mod serve;

use clap::{Parser, Subcommand};

/// LLM workflow engine - run ordered prompt steps gated by completion criteria
#[derive(Parser)]
#[command(name = "llm-workflow-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Execute a workflow definition file without starting the server
    Run(run::RunArgs),
}
