//! Per-step retry state machine

use std::sync::Arc;
use std::time::Instant;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{
    CompletionCriterion, InvocationError, ModelInvoker, RetryPolicy, Step, StepLog,
};

/// States a step moves through while it is being executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepState {
    Attempting,
    Evaluating,
    Satisfied,
    Exhausted,
}

/// Executes one step: invoke, evaluate, retry until satisfied or out of attempts
pub struct StepRunner {
    invoker: Arc<dyn ModelInvoker>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for StepRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRunner")
            .field("policy", &self.policy)
            .finish()
    }
}

impl StepRunner {
    pub fn new(invoker: Arc<dyn ModelInvoker>, policy: RetryPolicy) -> Self {
        Self { invoker, policy }
    }

    /// Run a step to a terminal state and produce its log.
    ///
    /// Never fails: invocation errors and unmet criteria are both recorded in
    /// the returned log. `retry_count` is always attempts made minus one.
    pub async fn run(&self, step_index: usize, step: &Step) -> StepLog {
        let start = Instant::now();
        let criterion = CompletionCriterion::parse(&step.completion_criteria);
        let max_attempts = self.policy.max_attempts.max(1);

        let mut state = StepState::Attempting;
        let mut attempts: u32 = 0;
        let mut last_output = String::new();
        let mut last_error: Option<String> = None;

        loop {
            match state {
                StepState::Attempting => {
                    attempts += 1;

                    match self.attempt(step).await {
                        Ok(text) => {
                            last_output = text;
                            last_error = None;
                            state = StepState::Evaluating;
                        }
                        Err(e) => {
                            warn!(
                                step_index,
                                attempt = attempts,
                                model = %step.model,
                                error = %e,
                                "Model invocation failed"
                            );

                            let retryable = e.is_retryable();
                            last_error = Some(e.to_string());

                            if retryable && attempts < max_attempts {
                                tokio::time::sleep(self.policy.delay_for_retry(attempts)).await;
                            } else {
                                state = StepState::Exhausted;
                            }
                        }
                    }
                }
                StepState::Evaluating => {
                    if criterion.is_satisfied_by(&last_output) {
                        state = StepState::Satisfied;
                    } else {
                        debug!(
                            step_index,
                            attempt = attempts,
                            criterion = criterion.kind(),
                            "Completion criterion not satisfied"
                        );

                        if attempts < max_attempts {
                            state = StepState::Attempting;
                        } else {
                            last_error = Some(format!(
                                "Completion criterion '{}' not satisfied after {} attempt(s)",
                                step.completion_criteria, attempts
                            ));
                            state = StepState::Exhausted;
                        }
                    }
                }
                StepState::Satisfied | StepState::Exhausted => break,
            }
        }

        let retry_count = attempts - 1;
        let elapsed = start.elapsed().as_millis() as u64;

        let log = match (state, last_error) {
            (StepState::Satisfied, _) => StepLog::passed(step_index, last_output, retry_count),
            (_, error) => StepLog::failed(
                step_index,
                last_output,
                retry_count,
                error.unwrap_or_else(|| "Step did not complete".to_string()),
            ),
        };

        debug!(
            step_index,
            passed = log.passed_criteria,
            retry_count,
            execution_time_ms = elapsed,
            "Step finished"
        );

        log.with_input_prompt(step.prompt.as_str())
            .with_execution_time(elapsed)
    }

    /// One bounded invocation
    async fn attempt(&self, step: &Step) -> Result<String, InvocationError> {
        let future = self.invoker.invoke(&step.model, &step.prompt);

        match timeout(self.policy.attempt_timeout(), future).await {
            Ok(result) => result,
            Err(_) => Err(InvocationError::transient(format!(
                "Model '{}' did not respond within {}ms",
                step.model, self.policy.attempt_timeout_ms
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{MockModelInvoker, ScriptedInvoker};
    use std::time::Duration;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts).with_initial_delay(0)
    }

    fn runner(invoker: impl ModelInvoker + 'static, max_attempts: u32) -> StepRunner {
        StepRunner::new(Arc::new(invoker), policy(max_attempts))
    }

    #[tokio::test]
    async fn test_passes_on_first_attempt() {
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .times(1)
            .returning(|_, _| Ok("hi".to_string()));

        let log = runner(invoker, 3)
            .run(0, &Step::new("m1", "say hi", "contains:hi"))
            .await;

        assert!(log.passed_criteria);
        assert_eq!(log.retry_count, 0);
        assert_eq!(log.llm_output, "hi");
        assert_eq!(log.input_prompt, "say hi");
        assert!(log.error.is_none());
    }

    #[tokio::test]
    async fn test_prompt_is_sent_verbatim() {
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .withf(|model, prompt| model.as_str() == "m1" && prompt == "  exact prompt\n")
            .times(1)
            .returning(|_, _| Ok("ok".to_string()));

        let log = runner(invoker, 3)
            .run(0, &Step::new("m1", "  exact prompt\n", ""))
            .await;

        assert!(log.passed_criteria);
    }

    #[tokio::test]
    async fn test_passes_on_third_attempt() {
        let invoker = ScriptedInvoker::new().with_script(
            "say hi",
            vec![
                Ok("Hello".to_string()),
                Ok("Hey".to_string()),
                Ok("hi".to_string()),
            ],
        );

        let log = runner(invoker, 3)
            .run(0, &Step::new("m1", "say hi", "contains:hi"))
            .await;

        assert!(log.passed_criteria);
        assert_eq!(log.retry_count, 2);
        assert_eq!(log.llm_output, "hi");
    }

    #[tokio::test]
    async fn test_never_satisfied_exhausts_attempts() {
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .times(3)
            .returning(|_, _| Ok("Hello".to_string()));

        let log = runner(invoker, 3)
            .run(0, &Step::new("m1", "say hi", "contains:hi"))
            .await;

        assert!(!log.passed_criteria);
        assert_eq!(log.retry_count, 2);
        assert_eq!(log.llm_output, "Hello");
        assert!(log.error.unwrap().contains("contains:hi"));
    }

    #[tokio::test]
    async fn test_single_attempt_budget() {
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .times(1)
            .returning(|_, _| Ok("nope".to_string()));

        let log = runner(invoker, 1).run(0, &Step::new("m1", "p", "json")).await;

        assert!(!log.passed_criteria);
        assert_eq!(log.retry_count, 0);
    }

    #[tokio::test]
    async fn test_permanent_error_stops_immediately() {
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .times(1)
            .returning(|_, _| Err(InvocationError::permanent("Unknown model 'mx'")));

        let log = runner(invoker, 5).run(3, &Step::new("mx", "p", "")).await;

        assert!(!log.passed_criteria);
        assert_eq!(log.step_index, 3);
        assert_eq!(log.input_prompt, "p");
        assert_eq!(log.retry_count, 0);
        assert_eq!(log.llm_output, "");
        assert!(log.error.unwrap().contains("Unknown model"));
    }

    #[tokio::test]
    async fn test_transient_error_then_success() {
        let invoker = ScriptedInvoker::new().with_script(
            "p",
            vec![
                Err(InvocationError::transient("connection reset")),
                Ok("{\"ok\": true}".to_string()),
            ],
        );

        let log = runner(invoker, 3).run(0, &Step::new("m1", "p", "json")).await;

        assert!(log.passed_criteria);
        assert_eq!(log.retry_count, 1);
        assert!(log.error.is_none());
    }

    #[tokio::test]
    async fn test_transient_exhaustion_keeps_last_text() {
        let invoker = ScriptedInvoker::new().with_script(
            "p",
            vec![
                Ok("partial".to_string()),
                Err(InvocationError::transient("503")),
            ],
        );

        let log = runner(invoker, 3).run(0, &Step::new("m1", "p", "code")).await;

        assert!(!log.passed_criteria);
        assert_eq!(log.retry_count, 2);
        assert_eq!(log.llm_output, "partial");
        assert!(log.error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_attempt_timeout_is_retried_then_exhausted() {
        let invoker = Arc::new(ScriptedInvoker::new().with_delay(Duration::from_secs(10)));
        let runner = StepRunner::new(
            invoker.clone(),
            policy(2).with_attempt_timeout(20),
        );

        let log = runner.run(0, &Step::new("m1", "slow", "")).await;

        assert!(!log.passed_criteria);
        assert_eq!(log.retry_count, 1);
        assert_eq!(invoker.calls(), 2);
        assert!(log.error.unwrap().contains("did not respond within 20ms"));
    }

    #[tokio::test]
    async fn test_criterion_failure_does_not_back_off() {
        let invoker = ScriptedInvoker::new().with_reply("p", "wrong");
        let runner = StepRunner::new(
            Arc::new(invoker),
            RetryPolicy::new(3).with_initial_delay(5_000),
        );

        let started = Instant::now();
        let log = runner.run(0, &Step::new("m1", "p", "contains:right")).await;

        assert!(!log.passed_criteria);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
