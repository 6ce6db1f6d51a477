use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use crate::progress::ProgressEvent;
use crate::resolve::ImportResolver;
use anyhow::Result;
use async_trait::async_trait;

/// Stubs every missing relative import so the project links
pub struct ResolvePhase;

#[async_trait]
impl PipelinePhase for ResolvePhase {
    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let report = ImportResolver::new().resolve_and_stub(&mut context.files);

        for stub in &report.stubs {
            context
                .report
                .warnings
                .push(format!("Generated placeholder module {}", stub));
        }

        context.report.stub_count = report.stubs.len();
        context.report.stubs = report.stubs;
        context.report.missing_imports = report.missing_imports;
        context.report.unsupported_packages = report.unsupported_packages;

        context.emit(ProgressEvent::StubsGenerated {
            count: context.report.stub_count,
        });
        Ok(())
    }
}
