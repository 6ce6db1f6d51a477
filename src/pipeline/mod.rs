//! Phase-based pipeline from raw LLM output to a buildable project

pub mod config;
pub mod context;
pub mod orchestrator;
pub mod phase_trait;
pub mod phases;
pub mod report;

pub use config::PipelineConfig;
pub use context::PipelineContext;
pub use orchestrator::PipelineOrchestrator;
pub use phase_trait::PipelinePhase;
pub use report::{PipelineOutput, PipelineReport, TranslatedFile};
