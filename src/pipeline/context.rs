//! Mutable state of one pipeline run

use super::config::PipelineConfig;
use super::report::PipelineReport;
use crate::escalation::CodeFixer;
use crate::progress::{ProgressEvent, ProgressHandler};
use crate::project::FileSet;
use crate::validation::ValidationFinding;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Owned by the orchestrator for exactly one run; nothing outlives it
pub struct PipelineContext {
    /// Raw LLM text, consumed by the extract phase
    pub input_text: Option<String>,
    pub files: FileSet,
    pub findings: Vec<ValidationFinding>,
    pub report: PipelineReport,
    pub config: PipelineConfig,
    pub fixer: Option<Arc<dyn CodeFixer>>,
    pub cancel: CancellationToken,
    progress: Option<Arc<dyn ProgressHandler>>,
}

impl PipelineContext {
    pub fn from_text(text: impl Into<String>, config: PipelineConfig) -> Self {
        Self {
            input_text: Some(text.into()),
            ..Self::from_files(FileSet::new(), config)
        }
    }

    pub fn from_files(files: FileSet, config: PipelineConfig) -> Self {
        Self {
            input_text: None,
            files,
            findings: Vec::new(),
            report: PipelineReport::default(),
            config,
            fixer: None,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    pub fn with_fixer(mut self, fixer: Option<Arc<dyn CodeFixer>>) -> Self {
        self.fixer = fixer;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: Option<Arc<dyn ProgressHandler>>) -> Self {
        self.progress = progress;
        self
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress {
            handler.on_progress(&event);
        }
    }
}
