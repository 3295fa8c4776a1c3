//! Workflow infrastructure implementations

mod executor_impl;
mod step_runner;

pub use executor_impl::WorkflowExecutorImpl;
pub use step_runner::StepRunner;
