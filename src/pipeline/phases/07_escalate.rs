use crate::deps::DependencyReconciler;
use crate::escalation::Escalator;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use crate::progress::ProgressEvent;
use crate::resolve::ImportResolver;
use crate::validation::validate_files;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Hands files that still have findings to the fixer, when one is configured
pub struct EscalatePhase;

/// Accepted files may import modules or packages the local stages never saw
fn relink(context: &mut PipelineContext) {
    let stubbed = ImportResolver::new().resolve_and_stub(&mut context.files);
    for stub in &stubbed.stubs {
        context
            .report
            .warnings
            .push(format!("Generated placeholder module {}", stub));
    }
    context.report.stub_count += stubbed.stubs.len();
    context.report.stubs.extend(stubbed.stubs);
    context.report.missing_imports.extend(stubbed.missing_imports);
    context.report.unsupported_packages = stubbed.unsupported_packages;

    let deps = DependencyReconciler::new().reconcile(&mut context.files);
    if !deps.added.is_empty() {
        debug!(added = deps.added.len(), "Declared packages imported by escalated files");
    }
    let report = &mut context.report.dependencies;
    report.manifest_created |= deps.manifest_created;
    report.manifest_recovered |= deps.manifest_recovered;
    report.added.extend(deps.added);
    report.unknown_packages = deps.unknown_packages;
}

fn skipped(context: &PipelineContext, reason: &str) -> Result<()> {
    context.emit(ProgressEvent::EscalationSkipped {
        reason: reason.to_string(),
    });
    Ok(())
}

#[async_trait]
impl PipelinePhase for EscalatePhase {
    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        if !context.config.escalation_enabled {
            return skipped(context, "escalation disabled");
        }
        if context.findings.is_empty() {
            return skipped(context, "no findings");
        }
        let Some(fixer) = context.fixer.clone() else {
            warn!("Escalation enabled but no fixer configured");
            return skipped(context, "no fixer configured");
        };

        let mut escalator = Escalator::new(fixer)
            .with_batch_size(context.config.batch_size)
            .with_timeout(context.config.escalation_timeout);
        if context.config.strict_scope {
            escalator = escalator.with_allowed_paths(context.config.allowed_paths.clone());
        }

        context.emit(ProgressEvent::EscalationStarted {
            files: context.findings.len(),
        });

        let findings = std::mem::take(&mut context.findings);
        let summary = escalator
            .escalate(&mut context.files, &findings, &context.cancel)
            .await;

        if !summary.accepted.is_empty() {
            relink(context);
        }
        context.findings = validate_files(&context.files);
        context.report.findings = context.findings.clone();
        context.report.warnings.extend(summary.warnings.iter().cloned());

        context.emit(ProgressEvent::EscalationComplete {
            accepted: summary.accepted.len(),
            rejected: summary.rejected.len(),
            scope_violations: summary.scope_violations.len(),
        });
        context.report.escalation = Some(summary);
        Ok(())
    }
}
