//! Output formatting for multiple formats
//!
//! JSON and YAML serialize the underlying records as-is. Human output is a
//! short tree-style summary meant for a terminal.
//!
//! # Example
//!
//! ```ignore
//! use fencefix::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_pipeline(&pipeline_output)?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::pipeline::PipelineOutput;
use crate::project::SourceFile;
use crate::validation::ValidationFinding;

const RULE_WIDTH: usize = 42;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

fn rule() -> String {
    "\u{2501}".repeat(RULE_WIDTH)
}

fn branch(is_last: bool) -> &'static str {
    if is_last {
        "\u{2514}\u{2500}"
    } else {
        "\u{251C}\u{2500}"
    }
}

fn line_count(content: &str) -> usize {
    content.lines().count()
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Formats extracted files
    pub fn format_files(&self, files: &[SourceFile]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.to_json(&files, "extracted files"),
            OutputFormat::Yaml => self.to_yaml(&files, "extracted files"),
            OutputFormat::Human => Ok(self.format_files_human(files)),
        }
    }

    /// Formats the files and report of a pipeline run
    pub fn format_pipeline(&self, output: &PipelineOutput) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.to_json(output, "pipeline output"),
            OutputFormat::Yaml => self.to_yaml(output, "pipeline output"),
            OutputFormat::Human => Ok(self.format_pipeline_human(output)),
        }
    }

    /// Formats validator findings for `checked` files
    pub fn format_findings(&self, findings: &[ValidationFinding], checked: usize) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.to_json(&findings, "validation findings"),
            OutputFormat::Yaml => self.to_yaml(&findings, "validation findings"),
            OutputFormat::Human => Ok(self.format_findings_human(findings, checked)),
        }
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T, what: &str) -> Result<String> {
        serde_json::to_string_pretty(value).with_context(|| format!("Failed to serialize {} to JSON", what))
    }

    fn to_yaml<T: Serialize + ?Sized>(&self, value: &T, what: &str) -> Result<String> {
        serde_yaml::to_string(value).with_context(|| format!("Failed to serialize {} to YAML", what))
    }

    fn format_files_human(&self, files: &[SourceFile]) -> String {
        let mut output = String::new();

        if files.is_empty() {
            output.push_str("\u{26A0} No files extracted\n");
            output.push_str(&rule());
            output.push('\n');
            return output;
        }

        output.push_str(&format!("\u{2713} Extracted {} file(s)\n", files.len()));
        output.push_str(&rule());
        output.push_str("\n\n");
        for (i, file) in files.iter().enumerate() {
            output.push_str(&format!(
                "{} {} ({}, {} lines)\n",
                branch(i == files.len() - 1),
                file.path,
                file.language,
                line_count(&file.content)
            ));
        }
        output
    }

    fn format_pipeline_human(&self, result: &PipelineOutput) -> String {
        let report = &result.report;
        let mut output = String::new();

        if report.is_clean() {
            output.push_str("\u{2713} Project Repaired\n");
        } else {
            output.push_str("\u{26A0} Project Repaired (With Remaining Findings)\n");
        }
        output.push_str(&rule());
        output.push_str("\n\n");

        output.push_str(&format!("Files:         {}\n", result.files.len()));
        if report.extracted > 0 {
            output.push_str(&format!("Extracted:     {}\n", report.extracted));
        }
        output.push_str(&format!("Fixes:         {}\n", report.total_fixes()));
        output.push_str(&format!("Stubs:         {}\n\n", report.stub_count));

        let moved: Vec<_> = report
            .translations
            .iter()
            .filter_map(|t| t.moved_from.as_ref().map(|from| (from, &t.path)))
            .collect();
        if !moved.is_empty() {
            output.push_str("Moved:\n");
            for (i, (from, to)) in moved.iter().enumerate() {
                output.push_str(&format!("{} {} -> {}\n", branch(i == moved.len() - 1), from, to));
            }
            output.push('\n');
        }

        let repaired: Vec<_> = report.repairs.iter().filter(|r| !r.fixes.is_empty()).collect();
        if !repaired.is_empty() {
            output.push_str("Repairs:\n");
            for (i, repair) in repaired.iter().enumerate() {
                output.push_str(&format!(
                    "{} {}: {}\n",
                    branch(i == repaired.len() - 1),
                    repair.path,
                    repair.fixes.join("; ")
                ));
            }
            output.push('\n');
        }

        if !report.stubs.is_empty() {
            output.push_str("Generated Stubs:\n");
            for (i, stub) in report.stubs.iter().enumerate() {
                output.push_str(&format!("{} {}\n", branch(i == report.stubs.len() - 1), stub));
            }
            output.push('\n');
        }

        let deps = &report.dependencies;
        if deps.changed() || !deps.unknown_packages.is_empty() {
            output.push_str("Dependencies:\n");
            if deps.manifest_created {
                output.push_str("\u{251C}\u{2500} package.json created\n");
            }
            if deps.manifest_recovered {
                output.push_str("\u{251C}\u{2500} package.json replaced (unreadable)\n");
            }
            for (name, version) in &deps.added {
                output.push_str(&format!("\u{251C}\u{2500} + {} {}\n", name, version));
            }
            if deps.unknown_packages.is_empty() {
                output.push_str("\u{2514}\u{2500} Unknown: (none)\n\n");
            } else {
                output.push_str(&format!("\u{2514}\u{2500} Unknown: {}\n\n", deps.unknown_packages.join(", ")));
            }
        }

        if let Some(escalation) = &report.escalation {
            output.push_str("Escalation:\n");
            output.push_str(&format!("\u{251C}\u{2500} Fixer:     {}\n", escalation.fixer));
            output.push_str(&format!("\u{251C}\u{2500} Sent:      {}\n", escalation.sent.len()));
            output.push_str(&format!("\u{251C}\u{2500} Accepted:  {}\n", escalation.accepted.len()));
            output.push_str(&format!("\u{2514}\u{2500} Rejected:  {}\n\n", escalation.rejected.len()));
        }

        if !report.findings.is_empty() {
            output.push_str(&self.findings_section(&report.findings));
        }

        if !report.warnings.is_empty() {
            output.push_str("\u{26A0} Warnings:\n");
            for warning in &report.warnings {
                output.push_str(&format!("  \u{2022} {}\n", warning));
            }
        }

        output
    }

    fn format_findings_human(&self, findings: &[ValidationFinding], checked: usize) -> String {
        let mut output = String::new();
        if findings.is_empty() {
            output.push_str(&format!("\u{2713} No findings in {} file(s)\n", checked));
            output.push_str(&rule());
            output.push('\n');
            return output;
        }

        output.push_str(&format!(
            "\u{26A0} {} of {} file(s) failed validation\n",
            findings.len(),
            checked
        ));
        output.push_str(&rule());
        output.push_str("\n\n");
        output.push_str(&self.findings_section(findings));
        output
    }

    fn findings_section(&self, findings: &[ValidationFinding]) -> String {
        let mut output = String::from("Findings:\n");
        for finding in findings {
            output.push_str(&format!("{}\n", finding.path));
            for (i, message) in finding.messages.iter().enumerate() {
                output.push_str(&format!(
                    "{} {}\n",
                    branch(i == finding.messages.len() - 1),
                    message
                ));
            }
        }
        output.push('\n');
        output
    }
}
