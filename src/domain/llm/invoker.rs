//! Model invocation contract used by the step runner

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::domain::model::ModelId;
use crate::domain::DomainError;

/// Failure of a single model invocation.
///
/// The split drives retry behavior: transient failures consume retry budget,
/// permanent failures end the step immediately.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("transient invocation error: {0}")]
    Transient(String),

    #[error("permanent invocation error: {0}")]
    Permanent(String),
}

impl InvocationError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient(message.into())
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self::Permanent(message.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<DomainError> for InvocationError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();

        match err {
            DomainError::Provider { .. } | DomainError::Storage { .. } => Self::Transient(message),
            // Request timeout and rate limiting clear up on their own
            DomainError::Rejected { status: 408 | 429, .. } => Self::Transient(message),
            DomainError::Rejected { .. }
            | DomainError::NotFound { .. }
            | DomainError::Validation { .. }
            | DomainError::Configuration { .. }
            | DomainError::Conflict { .. }
            | DomainError::Internal { .. } => Self::Permanent(message),
        }
    }
}

/// Invokes a model with a prompt and returns the generated text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, model: &ModelId, prompt: &str) -> Result<String, InvocationError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Invoker replaying scripted outcomes per prompt.
    ///
    /// The last scripted outcome for a prompt repeats forever. Prompts
    /// without a script are echoed back.
    #[derive(Debug, Default)]
    pub struct ScriptedInvoker {
        scripts: Mutex<HashMap<String, VecDeque<Result<String, InvocationError>>>>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl ScriptedInvoker {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_script(
            self,
            prompt: impl Into<String>,
            outcomes: Vec<Result<String, InvocationError>>,
        ) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(prompt.into(), outcomes.into_iter().collect());
            self
        }

        pub fn with_reply(self, prompt: impl Into<String>, reply: impl Into<String>) -> Self {
            self.with_script(prompt, vec![Ok(reply.into())])
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelInvoker for ScriptedInvoker {
        async fn invoke(&self, _model: &ModelId, prompt: &str) -> Result<String, InvocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(prompt) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => queue
                    .front()
                    .cloned()
                    .unwrap_or_else(|| Ok(prompt.to_string())),
                None => Ok(prompt.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_transient() {
        let err: InvocationError = DomainError::provider("openai", "connection reset").into();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_rate_limit_and_timeout_statuses_are_transient() {
        let rate_limited: InvocationError = DomainError::rejected("openai", 429, "slow down").into();
        let timed_out: InvocationError = DomainError::rejected("openai", 408, "timeout").into();

        assert!(rate_limited.is_retryable());
        assert!(timed_out.is_retryable());
    }

    #[test]
    fn test_client_errors_are_permanent() {
        let unauthorized: InvocationError = DomainError::rejected("openai", 401, "bad key").into();
        let unknown_model: InvocationError = DomainError::not_found("model 'x'").into();

        assert_eq!(
            unauthorized,
            InvocationError::Permanent(
                "Request rejected by openai (HTTP 401): bad key".to_string()
            )
        );
        assert!(!unknown_model.is_retryable());
    }

    #[test]
    fn test_display_carries_classification() {
        let err = InvocationError::transient("timed out after 50ms");
        assert_eq!(err.to_string(), "transient invocation error: timed out after 50ms");
    }
}
