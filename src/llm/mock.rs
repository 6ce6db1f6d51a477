use super::client::LLMClient;
use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// A scripted reply
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(BackendError),
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        MockResponse::Text(content.into())
    }

    pub fn error(error: BackendError) -> Self {
        MockResponse::Error(error)
    }
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<MockResponse>,
    received: Vec<LLMRequest>,
}

/// Test client that answers from a queue of scripted replies and keeps
/// every request it was sent
#[derive(Debug)]
pub struct MockLLMClient {
    script: Mutex<Script>,
    delay: Option<Duration>,
    name: String,
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self::with_name("MockLLM")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(Script::default()),
            delay: None,
            name: name.into(),
        }
    }

    /// Sleeps before every reply, to exercise timeouts and cancellation
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        // a panicking test thread must not hide the recorded requests
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_response(&self, response: MockResponse) {
        self.script().replies.push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        self.script().replies.extend(responses);
    }

    pub fn remaining_responses(&self) -> usize {
        self.script().replies.len()
    }

    pub fn request_count(&self) -> usize {
        self.script().received.len()
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<LLMRequest> {
        self.script().received.clone()
    }
}

impl Default for MockLLMClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        self.script().received.push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script().replies.pop_front();
        match next {
            Some(MockResponse::Text(content)) => Ok(LLMResponse::text(content, self.delay.unwrap_or_default())),
            Some(MockResponse::Error(error)) => Err(error),
            None => Err(BackendError::Other {
                message: format!("{}: reply queue is empty", self.name),
            }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model_info(&self) -> Option<String> {
        Some("scripted".to_string())
    }
}
