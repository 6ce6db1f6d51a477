//! fencefix - turns raw LLM output into a buildable Vite + React project
//!
//! Model output arrives as markdown with fenced code blocks, frequently cut
//! off mid-file, written for another framework's layout, or importing modules
//! it never wrote. This library recovers a project from that text in stages,
//! each of which recovers locally instead of failing.
//!
//! # Stages
//!
//! 1. **Extract**: split text into files using fences, path markers and the
//!    prose before each block
//! 2. **Translate**: move Next.js-style paths into a Vite layout and rewrite
//!    framework components to plain markup
//! 3. **Repair**: ordered syntax passes for common generation damage
//! 4. **Resolve**: find relative imports with no target and generate stubs
//! 5. **Dependencies**: add imported packages to `package.json`
//! 6. **Validate**: report what is still wrong
//! 7. **Escalate** (optional): hand the remaining files to an LLM fixer and
//!    keep only improvements
//!
//! # Example Usage
//!
//! ```ignore
//! use fencefix::{PipelineConfig, PipelineOrchestrator};
//!
//! async fn repair(text: &str) -> anyhow::Result<()> {
//!     let orchestrator = PipelineOrchestrator::new(PipelineConfig::default());
//!     let output = orchestrator.run_text(text).await?;
//!
//!     for file in &output.files {
//!         println!("{} ({} bytes)", file.path, file.content.len());
//!     }
//!     println!("stubs generated: {}", output.report.stub_count);
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`extract`], [`translate`], [`repair`], [`resolve`], [`deps`],
//!   [`validation`]: the stages, usable on their own
//! - [`pipeline`]: phase orchestration over a shared context
//! - [`escalation`] and [`llm`]: the optional LLM fixer
//! - [`progress`]: structured progress events
//! - [`cli`]: the `fencefix` command line

pub mod cli;
pub mod config;
pub mod deps;
pub mod escalation;
pub mod extract;
pub mod llm;
pub mod markup;
pub mod pipeline;
pub mod progress;
pub mod project;
pub mod repair;
pub mod resolve;
pub mod translate;
pub mod validation;

// Re-export key types for convenient access
pub use config::{ConfigError, FencefixConfig};
pub use deps::{DependencyManifest, DependencyReconciler, DependencyReport, ManifestError};
pub use escalation::{
    CodeFixer, EscalationError, EscalationRequest, EscalationResponse, EscalationSummary, Escalator,
    LlmFixer,
};
pub use extract::{extract_files, FileExtractor};
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient};
pub use pipeline::{PipelineConfig, PipelineOrchestrator, PipelineOutput, PipelineReport};
pub use progress::{LoggingHandler, ProgressEvent, ProgressHandler};
pub use project::{FileSet, SourceFile};
pub use repair::{RepairResult, Repairer};
pub use resolve::{ImportReference, ImportResolver, MissingImport, ResolutionReport};
pub use translate::PathTranslator;
pub use validation::{validate, validate_files, ValidationFinding, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_fencefix() {
        assert_eq!(NAME, "fencefix");
    }
}
