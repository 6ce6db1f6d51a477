use super::prompt::{build_user_prompt, SYSTEM_PROMPT};
use super::response::parse_fixer_response;
use super::types::{EscalationError, EscalationRequest, EscalationResponse};
use crate::llm::{BackendError, LLMClient, LLMRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Something that can repair files the local passes could not
#[async_trait]
pub trait CodeFixer: Send + Sync {
    async fn fix(&self, request: EscalationRequest) -> Result<EscalationResponse, EscalationError>;

    fn name(&self) -> &str;
}

/// [`CodeFixer`] backed by a chat model that answers in JSON
pub struct LlmFixer {
    client: Arc<dyn LLMClient>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmFixer {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            temperature: 0.1,
            max_tokens: 16_384,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl CodeFixer for LlmFixer {
    async fn fix(&self, request: EscalationRequest) -> Result<EscalationResponse, EscalationError> {
        let request = request.scoped();
        if request.files.is_empty() {
            return Ok(EscalationResponse::default());
        }

        let llm_request = LLMRequest::prompt(SYSTEM_PROMPT, build_user_prompt(&request))
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        debug!(
            client = self.client.name(),
            files = request.files.len(),
            "Sending files to fixer"
        );

        let response = self.client.chat(llm_request).await.map_err(|e| match e {
            BackendError::TimeoutError { seconds } => EscalationError::Timeout { seconds },
            other => EscalationError::Backend(other),
        })?;

        info!(
            client = self.client.name(),
            elapsed_ms = response.response_time.as_millis() as u64,
            "Fixer responded"
        );

        parse_fixer_response(&response.content)
    }

    fn name(&self) -> &str {
        self.client.name()
    }
}

impl std::fmt::Debug for LlmFixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmFixer")
            .field("client", &self.client.name())
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLLMClient, MockResponse};
    use crate::project::SourceFile;

    fn request() -> EscalationRequest {
        EscalationRequest::new(vec![SourceFile::new("src/App.tsx", "export default function App() {\n")])
    }

    #[tokio::test]
    async fn test_fixer_parses_fenced_reply() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::text(
            "```json\n{\"files\":[{\"path\":\"src/App.tsx\",\"content\":\"export default function App() {}\\n\",\"wasFixed\":true,\"fixes\":[\"closed body\"]}]}\n```",
        ));
        let fixer = LlmFixer::new(client.clone());

        let response = fixer.fix(request()).await.unwrap();
        assert_eq!(response.files.len(), 1);
        assert_eq!(response.files[0].fixes, vec!["closed body"]);

        let sent = client.requests();
        assert_eq!(sent[0].messages.len(), 2);
        assert!(sent[0].messages[1].content.contains("src/App.tsx"));
    }

    #[tokio::test]
    async fn test_backend_timeout_maps_to_timeout() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::error(BackendError::TimeoutError { seconds: 5 }));

        let result = LlmFixer::new(client).fix(request()).await;
        assert!(matches!(result, Err(EscalationError::Timeout { seconds: 5 })));
    }

    #[tokio::test]
    async fn test_malformed_reply() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::text("Sorry, I can't help with that."));

        let result = LlmFixer::new(client).fix(request()).await;
        assert!(matches!(result, Err(EscalationError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_empty_scope_skips_call() {
        let client = Arc::new(MockLLMClient::new());
        let fixer = LlmFixer::new(client.clone());

        let response = fixer
            .fix(request().with_scope(vec!["src/Other.tsx".to_string()]))
            .await
            .unwrap();
        assert!(response.files.is_empty());
        assert_eq!(client.request_count(), 0);
    }
}
