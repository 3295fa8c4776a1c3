//! LLM provider implementations

mod http_client;
mod invoker;
mod openai;

pub use http_client::{HttpClient, HttpClientTrait};
pub use invoker::{LlmModelInvoker, SamplingParams};
pub use openai::OpenAiProvider;
