use crate::extract::FileExtractor;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use crate::progress::ProgressEvent;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Turns fenced blocks of the input text into files; a no-op for file input
pub struct ExtractPhase;

#[async_trait]
impl PipelinePhase for ExtractPhase {
    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let Some(text) = context.input_text.take() else {
            debug!("No input text, skipping extraction");
            return Ok(());
        };

        let extracted = FileExtractor::new().extract(&text);
        if extracted.is_empty() {
            warn!("Input text contains no fenced code blocks");
            context
                .report
                .warnings
                .push("No fenced code blocks found in input".to_string());
        }

        context.report.extracted = extracted.len();
        for file in extracted {
            context.files.upsert(file);
        }

        context.emit(ProgressEvent::Extracted {
            files: context.report.extracted,
        });
        Ok(())
    }
}
