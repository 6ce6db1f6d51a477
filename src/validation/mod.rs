//! Read-only validation of generated source files
//!
//! Findings here decide whether a file goes to escalation; nothing in this
//! module mutates content.

mod checks;
mod lexer;

pub use checks::{has_export, is_component_like};
pub use lexer::{scan, Balance};

use crate::project::{extension_of, SourceFile, SCRIPT_EXTENSIONS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// All defects found in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub path: String,
    pub messages: Vec<String>,
}

/// Validates one file. Files that are neither scripts nor JSON are always valid.
pub fn validate(content: &str, path: &str) -> ValidationResult {
    let errors = match extension_of(path) {
        Some("json") => validate_json(content),
        Some(ext) if SCRIPT_EXTENSIONS.contains(&ext) => validate_script(content, path),
        _ => Vec::new(),
    };
    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

fn validate_script(content: &str, path: &str) -> Vec<String> {
    let mut errors = checks::bare_imports(content);
    errors.extend(checks::balance_messages(&scan(content)));
    errors.extend(checks::elision_markers(content));
    if is_component_like(path, content) && !has_export(content) {
        errors.push("Component file has no default or named export".to_string());
    }
    errors.extend(checks::suspicious_ending(content));
    errors
}

fn validate_json(content: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(_) => Vec::new(),
        Err(e) => vec![format!("Invalid JSON: {}", e)],
    }
}

/// One finding per file with at least one defect, in file order
pub fn validate_files<'a>(files: impl IntoIterator<Item = &'a SourceFile>) -> Vec<ValidationFinding> {
    files
        .into_iter()
        .filter_map(|file| {
            let result = validate(&file.content, &file.path);
            (!result.valid).then(|| ValidationFinding {
                path: file.path.clone(),
                messages: result.errors,
            })
        })
        .collect()
}
