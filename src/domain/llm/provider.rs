use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat-completion backends (OpenAI-compatible gateways, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    #[derive(Debug)]
    enum MockFailure {
        Transport(String),
        Rejected(u16, String),
    }

    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        response: Option<LlmResponse>,
        failure: Option<MockFailure>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                response: None,
                failure: None,
            }
        }

        pub fn with_response(mut self, response: LlmResponse) -> Self {
            self.response = Some(response);
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.failure = Some(MockFailure::Transport(error.into()));
            self
        }

        pub fn with_rejection(mut self, status: u16, error: impl Into<String>) -> Self {
            self.failure = Some(MockFailure::Rejected(status, error.into()));
            self
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(
            &self,
            _model: &str,
            _request: LlmRequest,
        ) -> Result<LlmResponse, DomainError> {
            match &self.failure {
                Some(MockFailure::Transport(error)) => {
                    return Err(DomainError::provider(self.name, error));
                }
                Some(MockFailure::Rejected(status, error)) => {
                    return Err(DomainError::rejected(self.name, *status, error));
                }
                None => {}
            }

            self.response
                .clone()
                .ok_or_else(|| DomainError::provider(self.name, "No mock response configured"))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
