//! Model invoker backed by a chat-completions provider

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{
    FinishReason, InvocationError, LlmProvider, LlmRequest, ModelCatalog, ModelId, ModelInvoker,
};

/// Sampling parameters applied to every invocation
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

/// Sends each prompt as a single user message to the configured provider
#[derive(Debug)]
pub struct LlmModelInvoker {
    provider: Arc<dyn LlmProvider>,
    catalog: ModelCatalog,
    sampling: SamplingParams,
}

impl LlmModelInvoker {
    pub fn new(provider: Arc<dyn LlmProvider>, catalog: ModelCatalog) -> Self {
        Self {
            provider,
            catalog,
            sampling: SamplingParams::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }
}

#[async_trait]
impl ModelInvoker for LlmModelInvoker {
    async fn invoke(&self, model: &ModelId, prompt: &str) -> Result<String, InvocationError> {
        if !self.catalog.contains(model.as_str()) {
            return Err(InvocationError::permanent(format!(
                "Unknown model '{}'",
                model
            )));
        }

        let request = LlmRequest::builder()
            .user(prompt)
            .temperature(self.sampling.temperature)
            .max_tokens(self.sampling.max_tokens)
            .build();

        debug!(
            provider = self.provider.provider_name(),
            model = %model,
            "Invoking model"
        );

        let response = self.provider.chat(model.as_str(), request).await?;

        if response.finish_reason == Some(FinishReason::Length) {
            warn!(model = %model, "Model output truncated at max_tokens");
        }
        debug!(
            model = %model,
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "Model responded"
        );

        Ok(response.content().to_string())
    }
}
