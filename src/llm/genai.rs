//! GenAI-based LLM client implementation
//!
//! Uses the `genai` crate so any of its providers (Ollama, OpenAI, Claude,
//! Gemini, Grok, Groq) can act as the escalation fixer.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage as GenAIChatMessage, ChatOptions, ChatRequest as GenAIChatRequest};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use std::time::Duration;
use tracing::{debug, error};

/// Overrides the provider's default endpoint (e.g. a local OpenAI-compatible server)
pub const API_BASE_URL_ENV: &str = "FENCEFIX_API_BASE_URL";

pub struct GenAIClient {
    client: Client,
    model: String,
    provider: AdapterKind,
    timeout: Duration,
}

fn custom_endpoint_client(provider: AdapterKind, model: &str, endpoint_url: String) -> Client {
    debug!("Using custom endpoint for {}: {}", provider.as_str(), endpoint_url);
    let model = model.to_string();
    let resolver = ServiceTargetResolver::from_resolver_fn(
        move |_default: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let auth = provider
                .default_key_env_name()
                .map(AuthData::from_env)
                .unwrap_or_else(|| AuthData::from_single(""));
            Ok(ServiceTarget {
                endpoint: Endpoint::from_owned(endpoint_url.clone()),
                auth,
                model: ModelIden::new(provider, &model),
            })
        },
    );
    Client::builder().with_service_target_resolver(resolver).build()
}

fn to_genai_message(message: &ChatMessage) -> GenAIChatMessage {
    match message.role {
        MessageRole::System => GenAIChatMessage::system(&message.content),
        MessageRole::User => GenAIChatMessage::user(&message.content),
        MessageRole::Assistant => GenAIChatMessage::assistant(&message.content),
    }
}

fn chat_options(request: &LLMRequest) -> ChatOptions {
    let mut options = ChatOptions::default();
    if let Some(temperature) = request.temperature {
        options = options.with_temperature(temperature as f64);
    }
    if let Some(max_tokens) = request.max_tokens {
        options = options.with_max_tokens(max_tokens);
    }
    options
}

impl GenAIClient {
    /// Creates a client for `model` on `provider`.
    ///
    /// Credentials are resolved by genai from the provider's usual variable;
    /// `FENCEFIX_API_BASE_URL` redirects every call to another endpoint.
    pub fn new(provider: AdapterKind, model: String, timeout: Duration) -> Result<Self, BackendError> {
        if model.trim().is_empty() {
            return Err(BackendError::ConfigurationError {
                message: "model name must not be empty".to_string(),
            });
        }

        let client = match std::env::var(API_BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => custom_endpoint_client(provider, &model, url),
            _ => Client::default(),
        };
        debug!(provider = provider.as_str(), model = %model, "Created GenAI client");

        Ok(Self {
            client,
            model,
            provider,
            timeout,
        })
    }
}

#[async_trait]
impl LLMClient for GenAIClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let start = std::time::Instant::now();
        let provider = self.provider.as_str();

        let options = chat_options(&request);
        let chat_request = GenAIChatRequest::new(request.messages.iter().map(to_genai_message).collect());

        let call = self.client.exec_chat(&self.model, chat_request, Some(&options));
        let response = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(provider, error = %e, "Fixer request failed");
                return Err(BackendError::ApiError {
                    message: format!("{} request failed: {}", provider, e),
                    status_code: None,
                });
            }
            Err(_) => {
                error!(provider, seconds = self.timeout.as_secs(), "Fixer request timed out");
                return Err(BackendError::TimeoutError {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(LLMResponse::text(text, start.elapsed())),
            _ => Err(BackendError::InvalidResponse {
                message: "empty completion".to_string(),
                raw_response: None,
            }),
        }
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
