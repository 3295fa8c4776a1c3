//! Workflow domain module
//!
//! A workflow is a named, ordered list of steps. Each step invokes one model
//! with a prompt and is gated by a completion criterion; failed attempts are
//! retried under a [`RetryPolicy`] until the criterion passes or the attempt
//! budget runs out.

pub mod criteria;
mod entity;
mod error;
mod executor;

pub use criteria::{evaluate, CompletionCriterion};
pub use entity::{Step, Workflow, WorkflowId};
pub use error::WorkflowError;
pub use executor::{RetryPolicy, WorkflowExecutor};
