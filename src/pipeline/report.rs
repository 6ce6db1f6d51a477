use crate::deps::DependencyReport;
use crate::escalation::EscalationSummary;
use crate::project::SourceFile;
use crate::repair::FileRepair;
use crate::resolve::MissingImport;
use crate::validation::ValidationFinding;
use serde::{Deserialize, Serialize};

/// A file the translator moved or rewrote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedFile {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_from: Option<String>,
    pub changes: Vec<String>,
}

/// Everything a run changed or noticed, in stage order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Files produced from fenced blocks (0 for file input)
    pub extracted: usize,
    pub translations: Vec<TranslatedFile>,
    pub repairs: Vec<FileRepair>,
    pub missing_imports: Vec<MissingImport>,
    pub stubs: Vec<String>,
    pub stub_count: usize,
    pub unsupported_packages: Vec<String>,
    pub dependencies: DependencyReport,
    /// Findings left after the last validation
    pub findings: Vec<ValidationFinding>,
    /// User-visible warnings
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation: Option<EscalationSummary>,
}

impl PipelineReport {
    pub fn total_fixes(&self) -> usize {
        self.repairs.iter().map(|r| r.fixes.len()).sum()
    }

    /// No findings remain
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub files: Vec<SourceFile>,
    pub report: PipelineReport,
}
