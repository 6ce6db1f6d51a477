use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use crate::progress::ProgressEvent;
use crate::validation::validate_files;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

pub struct ValidatePhase;

#[async_trait]
impl PipelinePhase for ValidatePhase {
    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let findings = validate_files(&context.files);
        for finding in &findings {
            debug!(path = %finding.path, messages = finding.messages.len(), "Validation finding");
        }

        context.report.findings = findings.clone();
        context.findings = findings;
        context.emit(ProgressEvent::ValidationComplete {
            findings: context.findings.len(),
        });
        Ok(())
    }
}
