use super::config::PipelineConfig;
use super::context::PipelineContext;
use super::phase_trait::PipelinePhase;
use super::phases::{
    dependencies::DependenciesPhase, escalate::EscalatePhase, extract::ExtractPhase,
    repair::RepairPhase, resolve::ResolvePhase, translate::TranslatePhase, validate::ValidatePhase,
};
use super::report::PipelineOutput;
use crate::escalation::CodeFixer;
use crate::progress::{ProgressEvent, ProgressHandler};
use crate::project::{FileSet, SourceFile};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Runs the ordered phases over one input and returns the finished project
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    fixer: Option<Arc<dyn CodeFixer>>,
    progress_handler: Option<Arc<dyn ProgressHandler>>,
    cancel: CancellationToken,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            fixer: None,
            progress_handler: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_fixer(mut self, fixer: Arc<dyn CodeFixer>) -> Self {
        self.fixer = Some(fixer);
        self
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    /// Token that aborts a running escalation; local results are still returned
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extracts files from raw LLM text, then runs the full pipeline
    pub async fn run_text(&self, text: &str) -> Result<PipelineOutput> {
        let context = self.context(PipelineContext::from_text(text, self.config.clone()));
        self.execute("text", context).await
    }

    /// Runs the pipeline over existing files
    pub async fn run_files(&self, files: Vec<SourceFile>) -> Result<PipelineOutput> {
        let files: FileSet = files.into_iter().map(SourceFile::normalized).collect();
        let input = format!("{} file(s)", files.len());
        let context = self.context(PipelineContext::from_files(files, self.config.clone()));
        self.execute(&input, context).await
    }

    fn context(&self, context: PipelineContext) -> PipelineContext {
        context
            .with_fixer(self.fixer.clone())
            .with_cancel(self.cancel.clone())
            .with_progress(self.progress_handler.clone())
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }

    async fn execute(&self, input: &str, mut context: PipelineContext) -> Result<PipelineOutput> {
        let start = Instant::now();
        info!("Starting pipeline for {} input", input);

        self.emit(ProgressEvent::Started {
            input: input.to_string(),
            files: context.files.len(),
        });

        let phases: Vec<(Box<dyn PipelinePhase>, &str)> = vec![
            (Box::new(ExtractPhase), "extract"),
            (Box::new(TranslatePhase), "translate"),
            (Box::new(RepairPhase), "repair"),
            (Box::new(ResolvePhase), "resolve"),
            (Box::new(DependenciesPhase), "dependencies"),
            (Box::new(ValidatePhase), "validate"),
            (Box::new(EscalatePhase), "escalate"),
        ];

        for (phase, phase_name) in phases {
            debug!("Phase: {}", phase_name);
            self.emit(ProgressEvent::PhaseStarted {
                phase: phase_name.to_string(),
            });

            let phase_start = Instant::now();
            if let Err(e) = phase
                .execute(&mut context)
                .await
                .with_context(|| format!("Phase {} failed", phase_name))
            {
                self.emit(ProgressEvent::Failed {
                    error: format!("{:#}", e),
                });
                return Err(e);
            }

            self.emit(ProgressEvent::PhaseComplete {
                phase: phase_name.to_string(),
                duration: phase_start.elapsed(),
            });
        }

        info!(
            "Pipeline complete: {} file(s), {} fix(es), {} stub(s), {} finding(s)",
            context.files.len(),
            context.report.total_fixes(),
            context.report.stub_count,
            context.report.findings.len()
        );
        self.emit(ProgressEvent::Completed {
            files: context.files.len(),
            total_time: start.elapsed(),
        });

        Ok(PipelineOutput {
            files: context.files.into_vec(),
            report: context.report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Category;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        phases: Mutex<Vec<String>>,
        categories: Mutex<Vec<Category>>,
    }

    impl ProgressHandler for Recorder {
        fn on_progress(&self, event: &ProgressEvent) {
            if let ProgressEvent::PhaseStarted { phase } = event {
                self.phases.lock().unwrap().push(phase.clone());
            }
            self.categories.lock().unwrap().push(event.category());
        }
    }

    #[tokio::test]
    async fn test_phases_run_in_order() {
        let recorder = Arc::new(Recorder::default());
        let orchestrator = PipelineOrchestrator::new(PipelineConfig::default()).with_progress(recorder.clone());

        orchestrator
            .run_text("```tsx\n// src/App.tsx\nexport default function App() { return <br>; }\n```\n")
            .await
            .unwrap();

        assert_eq!(
            *recorder.phases.lock().unwrap(),
            vec!["extract", "translate", "repair", "resolve", "dependencies", "validate", "escalate"]
        );
        let categories = recorder.categories.lock().unwrap();
        for expected in [Category::Extract, Category::Repair, Category::Deps, Category::Escalate] {
            assert!(categories.contains(&expected), "missing {}", expected);
        }
    }

    #[tokio::test]
    async fn test_run_files_normalizes_input() {
        let orchestrator = PipelineOrchestrator::new(PipelineConfig::default());
        let output = orchestrator
            .run_files(vec![SourceFile {
                path: "/src/App.tsx".to_string(),
                content: "export default function App() { return null; }\n".to_string(),
                language: String::new(),
            }])
            .await
            .unwrap();

        let app = output.files.iter().find(|f| f.path == "src/App.tsx").unwrap();
        assert_eq!(app.language, "tsx");
        assert!(output.files.iter().any(|f| f.path == "package.json"));
        assert_eq!(output.report.extracted, 0);
    }
}
