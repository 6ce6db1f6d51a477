use crate::llm::BackendError;
use crate::project::{normalize_path, SourceFile};
use crate::validation::ValidationFinding;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Files handed to an external fixer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationRequest {
    pub files: Vec<SourceFile>,
    /// Restrict both the outgoing and the returned files to `allowed_paths`
    #[serde(default)]
    pub strict_scope: bool,
    #[serde(default)]
    pub allowed_paths: Vec<String>,
    /// Validator output for the files being sent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<ValidationFinding>,
}

impl EscalationRequest {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self {
            files,
            ..Default::default()
        }
    }

    pub fn with_scope(mut self, allowed_paths: Vec<String>) -> Self {
        self.strict_scope = true;
        self.allowed_paths = allowed_paths.iter().map(|p| normalize_path(p)).collect();
        self
    }

    pub fn with_findings(mut self, findings: Vec<ValidationFinding>) -> Self {
        self.findings = findings;
        self
    }

    /// Whether a path may be sent or accepted under this request's scope
    pub fn in_scope(&self, path: &str) -> bool {
        !self.strict_scope || self.allowed_paths.iter().any(|allowed| allowed == path)
    }

    /// Drops outgoing files that fall outside the allowed paths
    pub fn scoped(mut self) -> Self {
        if self.strict_scope {
            let allowed = self.allowed_paths.clone();
            self.files.retain(|f| allowed.contains(&f.path));
            self.findings.retain(|f| allowed.contains(&f.path));
        }
        self
    }
}

/// A file as returned by the fixer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalatedFile {
    #[serde(flatten)]
    pub file: SourceFile,
    #[serde(default)]
    pub was_fixed: bool,
    #[serde(default)]
    pub fixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationResponse {
    #[serde(default)]
    pub files: Vec<EscalatedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum EscalationError {
    #[error("Escalation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Escalation aborted")]
    Aborted,

    #[error("Fixer backend failed: {0}")]
    Backend(#[from] BackendError),

    #[error("Fixer returned a malformed response: {0}")]
    MalformedResponse(String),
}
