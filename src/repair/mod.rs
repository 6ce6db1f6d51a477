//! Syntax repair
//!
//! An ordered list of narrowly scoped textual passes. Each pass is
//! idempotent on its own output, and the ordering is part of the contract:
//! template-literal reconstruction must see attributes before void-element
//! normalization rewrites their tags.
//!
//! Rules that insert missing closing braces, tags or parentheses at end of
//! file, append default exports, or self-close empty non-void elements are
//! intentionally absent. They corrupted more files than they fixed.

pub mod passes;

use crate::project::{extension_of, FileSet, SourceFile, MARKUP_EXTENSIONS, SCRIPT_EXTENSIONS};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of applying one pass to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub content: String,
    pub fixes: Vec<String>,
    pub warnings: Vec<String>,
}

impl PassOutcome {
    pub fn unchanged(content: &str) -> Self {
        Self {
            content: content.to_string(),
            fixes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fixes.push(fix.into());
        self
    }
}

pub trait RepairPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn applies_to(&self, path: &str) -> bool;

    fn apply(&self, path: &str, content: &str) -> PassOutcome;
}

/// Files that may contain JSX markup
pub fn is_markup_path(path: &str) -> bool {
    extension_of(path)
        .map(|ext| MARKUP_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

pub fn is_script_path(path: &str) -> bool {
    extension_of(path)
        .map(|ext| SCRIPT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Repaired content plus what was changed and what looked wrong but was left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairResult {
    pub content: String,
    pub fixes: Vec<String>,
    pub warnings: Vec<String>,
}

impl RepairResult {
    pub fn is_changed(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Per-file summary kept in the pipeline report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRepair {
    pub path: String,
    pub fixes: Vec<String>,
    pub warnings: Vec<String>,
}

pub struct Repairer {
    passes: Vec<Box<dyn RepairPass>>,
}

impl Repairer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_passes(passes: Vec<Box<dyn RepairPass>>) -> Self {
        Self { passes }
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn repair(&self, path: &str, content: &str) -> RepairResult {
        let mut result = RepairResult {
            content: content.to_string(),
            ..Default::default()
        };

        for pass in &self.passes {
            if !pass.applies_to(path) {
                continue;
            }
            let outcome = pass.apply(path, &result.content);
            if !outcome.fixes.is_empty() {
                debug!(path, pass = pass.name(), fixes = outcome.fixes.len(), "Repair pass applied");
            }
            result.content = outcome.content;
            result
                .fixes
                .extend(outcome.fixes.into_iter().map(|f| format!("{}: {}", pass.name(), f)));
            result
                .warnings
                .extend(outcome.warnings.into_iter().map(|w| format!("{}: {}", pass.name(), w)));
        }

        result
    }

    /// Repairs every file in place, returning a summary for files with fixes or warnings
    pub fn repair_all(&self, files: &mut FileSet) -> Vec<FileRepair> {
        let mut summaries = Vec::new();
        for file in files.iter_mut() {
            let result = self.repair(&file.path, &file.content);
            if result.fixes.is_empty() && result.warnings.is_empty() {
                continue;
            }
            file.content = result.content;
            summaries.push(FileRepair {
                path: file.path.clone(),
                fixes: result.fixes,
                warnings: result.warnings,
            });
        }
        summaries
    }

    pub fn repair_file(&self, file: &SourceFile) -> (SourceFile, RepairResult) {
        let result = self.repair(&file.path, &file.content);
        let mut repaired = file.clone();
        repaired.content = result.content.clone();
        (repaired, result)
    }
}

impl Default for Repairer {
    fn default() -> Self {
        Self {
            passes: passes::default_passes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pass_order() {
        assert_eq!(
            Repairer::new().pass_names(),
            vec![
                "template-literal",
                "attribute-leak",
                "void-elements",
                "class-name",
                "import-hygiene",
                "truncation",
                "export-check",
                "cleanup",
            ]
        );
    }

    #[test]
    fn test_hero_image_self_closed() {
        let content = "export default function Hero(){ return <img src=\"x\"> }";
        let result = Repairer::new().repair("src/components/Hero.tsx", content);

        assert!(result.content.contains("<img src=\"x\" />"));
        assert!(result.content.ends_with("}\n"));
        assert!(result.is_changed());
    }

    #[test]
    fn test_repair_is_idempotent() {
        let content = "'use client'\nimport React from react\nimport { cn } from '../lib/utils'\n\n\n\n\nexport default function Card() {\n  return (\n    <div class=\"card\">\n      <img src=\"a.png\" alt=\"a\">\n      <input value={v} onChange={(e) => set(e.target.value)}></input>\n      <br/>\n      <div className=\"px-4 ${active\n        ? 'on' : 'off'}`}>x</div>\n      <span className=\"a\n      <p>t</p>\n    </div>\n  );\n}\n```\n";
        let repairer = Repairer::new();
        let once = repairer.repair("src/components/Card.tsx", content);
        let twice = repairer.repair("src/components/Card.tsx", &once.content);

        assert!(once.fixes.len() >= 8, "{:?}", once.fixes);
        assert!(twice.fixes.is_empty(), "{:?}", twice.fixes);
        assert_eq!(twice.content, once.content);
    }

    #[test]
    fn test_truncated_tag_with_following_tag() {
        let content = "export default function A() {\n  return (\n    <div>\n  <div className=\"px-4\n  <p>Hello</p>\n    </div>\n  );\n}\n";
        let result = Repairer::new().repair("src/A.tsx", content);
        assert!(result.content.contains("  <div className=\"px-4\">\n  <p>Hello</p>"));
    }

    #[test]
    fn test_truncated_tag_at_end_left_alone() {
        let content = "export default function A() {\n  return (\n  <div className=\"px-4";
        let result = Repairer::new().repair("src/A.tsx", content);
        assert!(result.content.ends_with("<div className=\"px-4\n"));
        assert!(!result.fixes.iter().any(|f| f.starts_with("truncation")));
    }

    #[test]
    fn test_missing_export_is_warning_only() {
        let content = "function Widget() {\n  return <div />;\n}\n";
        let result = Repairer::new().repair("src/components/Widget.tsx", content);
        assert_eq!(result.content, content);
        assert!(result.fixes.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_repair_all_only_reports_touched_files() {
        let mut files: FileSet = vec![
            SourceFile::new("src/ok.ts", "export const a = 1;\n"),
            SourceFile::new("src/B.tsx", "export default function B() { return <hr>; }\n"),
        ]
        .into_iter()
        .collect();

        let summaries = Repairer::new().repair_all(&mut files);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].path, "src/B.tsx");
        assert!(files.get("src/B.tsx").unwrap().content.contains("<hr />"));
    }
}
