//! Domain layer - Core business logic and entities

pub mod error;
pub mod llm;
pub mod model;
pub mod run;
pub mod storage;
pub mod workflow;

pub use error::DomainError;
pub use llm::{
    FinishReason, InvocationError, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse,
    Message, MessageRole, ModelInvoker, Usage,
};
pub use model::{ModelCatalog, ModelId};
pub use run::{Run, RunError, RunId, RunStatus, StepLog};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use workflow::{
    evaluate, CompletionCriterion, RetryPolicy, Step, Workflow, WorkflowError, WorkflowExecutor,
    WorkflowId,
};
