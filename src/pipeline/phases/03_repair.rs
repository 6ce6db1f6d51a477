use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use crate::progress::ProgressEvent;
use crate::repair::Repairer;
use anyhow::Result;
use async_trait::async_trait;

pub struct RepairPhase;

#[async_trait]
impl PipelinePhase for RepairPhase {
    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let repairs = Repairer::default().repair_all(&mut context.files);

        let event = ProgressEvent::RepairComplete {
            files_fixed: repairs.iter().filter(|r| !r.fixes.is_empty()).count(),
            fixes: repairs.iter().map(|r| r.fixes.len()).sum(),
            warnings: repairs.iter().map(|r| r.warnings.len()).sum(),
        };
        context.report.repairs = repairs;
        context.emit(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineConfig;
    use crate::project::{FileSet, SourceFile};

    #[tokio::test]
    async fn test_repair_phase() {
        let files: FileSet = vec![SourceFile::new(
            "src/components/Hero.tsx",
            "export default function Hero(){ return <img src=\"x\"> }\n",
        )]
        .into_iter()
        .collect();
        let mut context = PipelineContext::from_files(files, PipelineConfig::default());

        RepairPhase.execute(&mut context).await.unwrap();

        assert!(context
            .files
            .get("src/components/Hero.tsx")
            .unwrap()
            .content
            .contains("<img src=\"x\" />"));
        assert_eq!(context.report.repairs.len(), 1);
        assert!(context.report.total_fixes() >= 1);
    }
}
