//! Progress handler trait and events

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Pipeline area an event belongs to, attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Extract,
    Translate,
    Repair,
    Resolve,
    Deps,
    Validate,
    Escalate,
    Pipeline,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Extract => "extract",
            Category::Translate => "translate",
            Category::Repair => "repair",
            Category::Resolve => "resolve",
            Category::Deps => "deps",
            Category::Validate => "validate",
            Category::Escalate => "escalate",
            Category::Pipeline => "pipeline",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted while a pipeline run progresses
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started on `files` input files (0 for text input)
    Started { input: String, files: usize },

    PhaseStarted { phase: String },

    PhaseComplete { phase: String, duration: Duration },

    /// Fenced blocks turned into files
    Extracted { files: usize },

    Translated { moved: usize, changed: usize },

    RepairComplete {
        files_fixed: usize,
        fixes: usize,
        warnings: usize,
    },

    StubsGenerated { count: usize },

    DependenciesReconciled {
        added: usize,
        manifest_created: bool,
    },

    ValidationComplete { findings: usize },

    EscalationStarted { files: usize },

    EscalationSkipped { reason: String },

    EscalationComplete {
        accepted: usize,
        rejected: usize,
        scope_violations: usize,
    },

    Completed { files: usize, total_time: Duration },

    Failed { error: String },
}

impl ProgressEvent {
    pub fn category(&self) -> Category {
        match self {
            ProgressEvent::Extracted { .. } => Category::Extract,
            ProgressEvent::Translated { .. } => Category::Translate,
            ProgressEvent::RepairComplete { .. } => Category::Repair,
            ProgressEvent::StubsGenerated { .. } => Category::Resolve,
            ProgressEvent::DependenciesReconciled { .. } => Category::Deps,
            ProgressEvent::ValidationComplete { .. } => Category::Validate,
            ProgressEvent::EscalationStarted { .. }
            | ProgressEvent::EscalationSkipped { .. }
            | ProgressEvent::EscalationComplete { .. } => Category::Escalate,
            ProgressEvent::Started { .. }
            | ProgressEvent::PhaseStarted { .. }
            | ProgressEvent::PhaseComplete { .. }
            | ProgressEvent::Completed { .. }
            | ProgressEvent::Failed { .. } => Category::Pipeline,
        }
    }
}

/// Receives progress events from the orchestrator
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
