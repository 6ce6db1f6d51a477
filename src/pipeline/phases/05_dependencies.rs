use crate::deps::DependencyReconciler;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use crate::progress::ProgressEvent;
use anyhow::Result;
use async_trait::async_trait;

pub struct DependenciesPhase;

#[async_trait]
impl PipelinePhase for DependenciesPhase {
    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let report = DependencyReconciler::new().reconcile(&mut context.files);

        if report.manifest_recovered {
            context
                .report
                .warnings
                .push("package.json was not valid and has been recreated".to_string());
        }

        context.emit(ProgressEvent::DependenciesReconciled {
            added: report.added.len(),
            manifest_created: report.manifest_created,
        });
        context.report.dependencies = report;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineConfig;
    use crate::project::{FileSet, SourceFile, MANIFEST_PATH};

    #[tokio::test]
    async fn test_dependencies_phase() {
        let files: FileSet = vec![
            SourceFile::new(MANIFEST_PATH, "{ broken"),
            SourceFile::new("src/App.tsx", "import clsx from 'clsx';\n"),
        ]
        .into_iter()
        .collect();
        let mut context = PipelineContext::from_files(files, PipelineConfig::default());

        DependenciesPhase.execute(&mut context).await.unwrap();

        assert!(context.report.dependencies.manifest_recovered);
        assert_eq!(context.report.warnings.len(), 1);
        assert!(context.files.get(MANIFEST_PATH).unwrap().content.contains("\"clsx\""));
    }
}
