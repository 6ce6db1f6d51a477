//! Errors raised by LLM clients

use serde::{Deserialize, Serialize};
use thiserror::Error;

fn http_suffix(status_code: &Option<u16>) -> String {
    status_code.map(|code| format!(" (HTTP {})", code)).unwrap_or_default()
}

/// Transport-level failures talking to a provider.
///
/// The escalator treats every variant the same way (keep the local files),
/// so these carry enough context for logs and nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BackendError {
    #[error("API error{}: {message}", http_suffix(.status_code))]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Request timed out after {seconds} seconds")]
    TimeoutError { seconds: u64 },

    /// The provider answered, but not with usable text
    #[error("Invalid response from LLM: {message}")]
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl BackendError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::TimeoutError { .. })
    }
}
