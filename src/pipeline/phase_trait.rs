use super::context::PipelineContext;
use anyhow::Result;
use async_trait::async_trait;

/// One ordered step of a run. Phases read and update the shared context.
#[async_trait]
pub trait PipelinePhase: Send + Sync {
    async fn execute(&self, context: &mut PipelineContext) -> Result<()>;
}
