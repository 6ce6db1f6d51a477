use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// A chat-completion backend.
///
/// Implementations must be safe to share across tasks; the escalator holds
/// one behind an `Arc` for the whole run.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError>;

    /// Short display name used in logs and escalation summaries
    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}

#[async_trait]
impl<T: LLMClient + ?Sized> LLMClient for Arc<T> {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        (**self).chat(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn model_info(&self) -> Option<String> {
        (**self).model_info()
    }
}
