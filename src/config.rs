//! Configuration management for fencefix
//!
//! Settings are read from environment variables with defaults; command-line
//! flags override them afterwards.
//!
//! # Environment Variables
//!
//! - `FENCEFIX_PROVIDER`: escalation provider (ollama|openai|claude|gemini|grok|groq) - default: "ollama"
//! - `FENCEFIX_MODEL`: model name - default depends on the provider ("qwen2.5-coder:7b" for ollama)
//! - `FENCEFIX_ESCALATE`: send unrepaired files to the LLM fixer (true|false) - default: "false"
//! - `FENCEFIX_ESCALATION_TIMEOUT`: seconds per fixer call - default: "60"
//! - `FENCEFIX_ESCALATION_BATCH_SIZE`: files per fixer call, at most 15 - default: "15"
//! - `FENCEFIX_LOG_LEVEL`: logging level - default: "info"
//! - `FENCEFIX_API_BASE_URL`: optional custom endpoint for the provider
//!
//! Provider credentials are read by the genai library itself
//! (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY`, `XAI_API_KEY`,
//! `GROQ_API_KEY`, `OLLAMA_HOST`).

use crate::escalation::{CodeFixer, LlmFixer, MAX_BATCH_SIZE};
use crate::llm::{BackendError, GenAIClient};
use crate::pipeline::PipelineConfig;
use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ESCALATION_TIMEOUT_SECS: u64 = 60;
const MAX_ESCALATION_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: ollama, openai, claude, gemini, grok, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] BackendError),
}

/// Maps a provider name (including the genai spellings) to its adapter
pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    let lower = name.trim().to_lowercase();
    match lower.as_str() {
        "ollama" => Ok(AdapterKind::Ollama),
        "openai" => Ok(AdapterKind::OpenAI),
        "claude" | "anthropic" => Ok(AdapterKind::Anthropic),
        "gemini" => Ok(AdapterKind::Gemini),
        "grok" | "xai" => Ok(AdapterKind::Xai),
        "groq" => Ok(AdapterKind::Groq),
        _ => Err(ConfigError::InvalidProvider(name.to_string())),
    }
}

pub fn default_model(provider: AdapterKind) -> &'static str {
    match provider {
        AdapterKind::Ollama => DEFAULT_OLLAMA_MODEL,
        AdapterKind::OpenAI => "gpt-4o-mini",
        AdapterKind::Anthropic => "claude-3-5-sonnet-latest",
        AdapterKind::Gemini => "gemini-1.5-flash",
        AdapterKind::Xai => "grok-2-latest",
        AdapterKind::Groq => "llama-3.3-70b-versatile",
        _ => DEFAULT_OLLAMA_MODEL,
    }
}

#[derive(Debug, Clone)]
pub struct FencefixConfig {
    /// LLM provider used for escalation
    pub provider: AdapterKind,
    pub model: String,
    pub escalate: bool,
    pub escalation_timeout_secs: u64,
    pub batch_size: usize,
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for FencefixConfig {
    /// Loads `FENCEFIX_*` variables, falling back to defaults for missing or
    /// unparsable values
    fn default() -> Self {
        let provider = match env::var("FENCEFIX_PROVIDER") {
            Ok(name) => parse_provider(&name).unwrap_or_else(|e| {
                warn!("{}; using ollama", e);
                AdapterKind::Ollama
            }),
            Err(_) => AdapterKind::Ollama,
        };

        let model = env::var("FENCEFIX_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_model(provider).to_string());

        let escalate = env::var("FENCEFIX_ESCALATE")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let escalation_timeout_secs = env::var("FENCEFIX_ESCALATION_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_ESCALATION_TIMEOUT_SECS);

        let batch_size = env::var("FENCEFIX_ESCALATION_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(MAX_BATCH_SIZE);

        let log_level = env::var("FENCEFIX_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            model,
            escalate,
            escalation_timeout_secs,
            batch_size,
            log_level,
        }
    }
}

impl FencefixConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.escalation_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Escalation timeout must be at least 1 second".to_string(),
            ));
        }
        if self.escalation_timeout_secs > MAX_ESCALATION_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Escalation timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::ValidationFailed(format!(
                "Escalation batch size must be between 1 and {}",
                MAX_BATCH_SIZE
            )));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn escalation_timeout(&self) -> Duration {
        Duration::from_secs(self.escalation_timeout_secs)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_escalation(self.escalate)
            .with_escalation_timeout(self.escalation_timeout())
            .with_batch_size(self.batch_size)
    }

    /// Builds the LLM-backed fixer for the configured provider
    pub fn create_fixer(&self) -> Result<Arc<dyn CodeFixer>, ConfigError> {
        let client = GenAIClient::new(self.provider, self.model.clone(), self.escalation_timeout())?;
        Ok(Arc::new(LlmFixer::new(Arc::new(client))))
    }
}

impl fmt::Display for FencefixConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fencefix Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Escalate: {}", self.escalate)?;
        writeln!(f, "  Escalation Timeout: {}s", self.escalation_timeout_secs)?;
        writeln!(f, "  Batch Size: {}", self.batch_size)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Sets an environment variable for the lifetime of the guard
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn clear_all() -> Vec<EnvGuard> {
        [
            "FENCEFIX_PROVIDER",
            "FENCEFIX_MODEL",
            "FENCEFIX_ESCALATE",
            "FENCEFIX_ESCALATION_TIMEOUT",
            "FENCEFIX_ESCALATION_BATCH_SIZE",
            "FENCEFIX_LOG_LEVEL",
        ]
        .iter()
        .map(|key| EnvGuard::unset(key))
        .collect()
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = clear_all();

        let config = FencefixConfig::default();

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.model, DEFAULT_OLLAMA_MODEL);
        assert!(!config.escalate);
        assert_eq!(config.escalation_timeout_secs, 60);
        assert_eq!(config.batch_size, 15);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _cleared = clear_all();
        let _guards = vec![
            EnvGuard::set("FENCEFIX_PROVIDER", "claude"),
            EnvGuard::set("FENCEFIX_ESCALATE", "true"),
            EnvGuard::set("FENCEFIX_ESCALATION_TIMEOUT", "30"),
            EnvGuard::set("FENCEFIX_ESCALATION_BATCH_SIZE", "5"),
            EnvGuard::set("FENCEFIX_LOG_LEVEL", "DEBUG"),
        ];

        let config = FencefixConfig::default();

        assert_eq!(config.provider, AdapterKind::Anthropic);
        assert_eq!(config.model, default_model(AdapterKind::Anthropic));
        assert!(config.escalate);
        assert_eq!(config.escalation_timeout_secs, 30);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.log_level, "debug");

        let pipeline = config.pipeline_config();
        assert!(pipeline.escalation_enabled);
        assert_eq!(pipeline.escalation_timeout, Duration::from_secs(30));
        assert_eq!(pipeline.batch_size, 5);
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back() {
        let _cleared = clear_all();
        let _guards = vec![
            EnvGuard::set("FENCEFIX_PROVIDER", "skynet"),
            EnvGuard::set("FENCEFIX_ESCALATION_TIMEOUT", "soon"),
            EnvGuard::set("FENCEFIX_MODEL", "custom-model"),
        ];

        let config = FencefixConfig::default();
        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.escalation_timeout_secs, 60);
        assert_eq!(config.model, "custom-model");
    }

    #[test]
    fn test_validation_ranges() {
        let base = FencefixConfig {
            provider: AdapterKind::Ollama,
            model: "m".to_string(),
            escalate: false,
            escalation_timeout_secs: 60,
            batch_size: 15,
            log_level: "info".to_string(),
        };
        assert!(base.validate().is_ok());

        let cases = [
            FencefixConfig { escalation_timeout_secs: 0, ..base.clone() },
            FencefixConfig { escalation_timeout_secs: 601, ..base.clone() },
            FencefixConfig { batch_size: 0, ..base.clone() },
            FencefixConfig { batch_size: 16, ..base.clone() },
            FencefixConfig { log_level: "loud".to_string(), ..base.clone() },
            FencefixConfig { model: " ".to_string(), ..base.clone() },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(ConfigError::ValidationFailed(_))));
        }
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("Grok").unwrap(), AdapterKind::Xai);
        assert_eq!(parse_provider("anthropic").unwrap(), AdapterKind::Anthropic);
        assert!(matches!(parse_provider("nope"), Err(ConfigError::InvalidProvider(_))));
    }

    #[test]
    fn test_display() {
        let config = FencefixConfig {
            provider: AdapterKind::Groq,
            model: "llama".to_string(),
            escalate: true,
            escalation_timeout_secs: 10,
            batch_size: 3,
            log_level: "warn".to_string(),
        };
        let text = config.to_string();
        assert!(text.contains("Provider: Groq"));
        assert!(text.contains("Batch Size: 3"));
    }
}
