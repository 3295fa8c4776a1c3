//! Run domain module
//!
//! A run is one execution of a workflow. It records a step log per step in
//! workflow order and ends as `completed` only when every step passed.

mod entity;
mod error;

pub use entity::{Run, RunId, RunStatus, StepLog};
pub use error::RunError;
