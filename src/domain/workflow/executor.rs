//! Workflow executor trait and retry policy

use std::time::Duration;

use async_trait::async_trait;

use super::entity::Workflow;
use crate::domain::run::Run;

/// Retry policy applied to every step of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per step, including the first (at least 1)
    pub max_attempts: u32,
    /// Upper bound for a single model invocation
    pub attempt_timeout_ms: u64,
    /// Delay before the first retry after a transient error
    pub initial_delay_ms: u64,
    /// Maximum delay between retries
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout_ms: 60_000,
            initial_delay_ms: 200,
            max_delay_ms: 5_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget, clamped to at least 1
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    pub fn with_attempt_timeout(mut self, ms: u64) -> Self {
        self.attempt_timeout_ms = ms;
        self
    }

    pub fn with_initial_delay(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn with_max_delay(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Delay before retry number `retry` (1-indexed)
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        let delay_ms = delay.min(self.max_delay_ms as f64).max(0.0) as u64;

        Duration::from_millis(delay_ms)
    }
}

/// Runs a workflow to completion.
///
/// Steps run strictly in order and a failed step never stops the run. The
/// returned run is always terminal and holds one log per step.
#[async_trait]
pub trait WorkflowExecutor: Send + Sync + std::fmt::Debug {
    async fn execute(&self, workflow: &Workflow) -> Run;
}
