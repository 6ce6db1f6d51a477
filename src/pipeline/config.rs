use crate::escalation::{DEFAULT_TIMEOUT, MAX_BATCH_SIZE};
use crate::project::normalize_path;
use crate::translate::ENTRY_SCRIPT;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Send files that still have findings to the configured fixer
    pub escalation_enabled: bool,
    pub escalation_timeout: Duration,
    pub batch_size: usize,
    /// Only `allowed_paths` may be escalated or replaced by the fixer
    pub strict_scope: bool,
    pub allowed_paths: Vec<String>,
    /// Module script the entry HTML is pointed at
    pub entry_script: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            escalation_enabled: false,
            escalation_timeout: DEFAULT_TIMEOUT,
            batch_size: MAX_BATCH_SIZE,
            strict_scope: false,
            allowed_paths: Vec::new(),
            entry_script: ENTRY_SCRIPT.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_escalation(mut self, enabled: bool) -> Self {
        self.escalation_enabled = enabled;
        self
    }

    pub fn with_escalation_timeout(mut self, timeout: Duration) -> Self {
        self.escalation_timeout = timeout;
        self
    }

    /// Clamped to `1..=15`
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Allowed paths are normalized like file paths (`./src/App.tsx` is `src/App.tsx`)
    pub fn with_strict_scope(mut self, allowed_paths: Vec<String>) -> Self {
        self.strict_scope = true;
        self.allowed_paths = allowed_paths.iter().map(|p| normalize_path(p)).collect();
        self
    }

    pub fn with_entry_script(mut self, entry_script: impl Into<String>) -> Self {
        self.entry_script = entry_script.into();
        self
    }
}
