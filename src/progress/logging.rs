//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Forwards progress events to `tracing`, tagged with their category
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        let category = event.category().as_str();
        match event {
            ProgressEvent::Started { input, files } => {
                info!(category, input = %input, files, "Starting pipeline");
            }
            ProgressEvent::PhaseStarted { phase } => {
                debug!(category, phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                debug!(
                    category,
                    phase = %phase,
                    duration_ms = duration.as_millis() as u64,
                    "Phase complete"
                );
            }
            ProgressEvent::Extracted { files } => {
                info!(category, files, "Extracted files from text");
            }
            ProgressEvent::Translated { moved, changed } => {
                if *changed > 0 {
                    info!(category, moved, changed, "Translated framework conventions");
                } else {
                    debug!(category, "Nothing to translate");
                }
            }
            ProgressEvent::RepairComplete {
                files_fixed,
                fixes,
                warnings,
            } => {
                info!(category, files_fixed, fixes, warnings, "Syntax repair complete");
            }
            ProgressEvent::StubsGenerated { count } => {
                if *count > 0 {
                    warn!(category, stubs = count, "Generated placeholder modules for missing imports");
                } else {
                    debug!(category, "All imports resolve");
                }
            }
            ProgressEvent::DependenciesReconciled {
                added,
                manifest_created,
            } => {
                info!(category, added, manifest_created, "Dependencies reconciled");
            }
            ProgressEvent::ValidationComplete { findings } => {
                if *findings > 0 {
                    warn!(category, findings, "Validation found defects");
                } else {
                    info!(category, "Validation clean");
                }
            }
            ProgressEvent::EscalationStarted { files } => {
                info!(category, files, "Escalating files to fixer");
            }
            ProgressEvent::EscalationSkipped { reason } => {
                debug!(category, reason = %reason, "Escalation skipped");
            }
            ProgressEvent::EscalationComplete {
                accepted,
                rejected,
                scope_violations,
            } => {
                if *scope_violations > 0 {
                    warn!(category, accepted, rejected, scope_violations, "Escalation complete with scope violations");
                } else {
                    info!(category, accepted, rejected, "Escalation complete");
                }
            }
            ProgressEvent::Completed { files, total_time } => {
                info!(
                    category,
                    files,
                    total_time_ms = total_time.as_millis() as u64,
                    "Pipeline complete"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(category, error = %error, "Pipeline failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::Started {
                input: "-".to_string(),
                files: 0,
            },
            ProgressEvent::PhaseStarted {
                phase: "extract".to_string(),
            },
            ProgressEvent::PhaseComplete {
                phase: "extract".to_string(),
                duration: Duration::from_millis(3),
            },
            ProgressEvent::Extracted { files: 2 },
            ProgressEvent::Translated { moved: 1, changed: 1 },
            ProgressEvent::Translated { moved: 0, changed: 0 },
            ProgressEvent::RepairComplete {
                files_fixed: 1,
                fixes: 2,
                warnings: 0,
            },
            ProgressEvent::StubsGenerated { count: 0 },
            ProgressEvent::StubsGenerated { count: 1 },
            ProgressEvent::DependenciesReconciled {
                added: 2,
                manifest_created: true,
            },
            ProgressEvent::ValidationComplete { findings: 0 },
            ProgressEvent::ValidationComplete { findings: 1 },
            ProgressEvent::EscalationStarted { files: 1 },
            ProgressEvent::EscalationSkipped {
                reason: "disabled".to_string(),
            },
            ProgressEvent::EscalationComplete {
                accepted: 1,
                rejected: 0,
                scope_violations: 1,
            },
            ProgressEvent::Completed {
                files: 3,
                total_time: Duration::from_millis(40),
            },
            ProgressEvent::Failed {
                error: "Test error".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
