//! Framework path translation
//!
//! Rewrites files produced under a file-routing framework convention into the
//! flat Vite + React layout the runtime builds. Every rule is textual,
//! idempotent, and a no-op when its precondition does not hold; translation
//! never fails.

mod components;
mod paths;

pub use components::{rewrite_entry_html, strip_client_directive, ENTRY_SCRIPT};
pub use paths::{translate_module_path, translate_path, PathRule};

use crate::project::{parent_dir, relative_specifier, resolve_relative, FileSet, SourceFile};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// A translated file plus human-readable descriptions of what changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub file: SourceFile,
    /// Original path when the file moved
    pub moved_from: Option<String>,
    pub changes: Vec<String>,
}

fn relative_import_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(\bfrom\s+|\bimport\s*\(\s*|\bimport\s+|\brequire\s*\(\s*)(['"])(\.{1,2}/[^'"\n]*)(['"])"#)
            .expect("Invalid relative import regex")
    })
}

#[derive(Debug, Clone)]
pub struct PathTranslator {
    entry_script: String,
}

impl Default for PathTranslator {
    fn default() -> Self {
        Self {
            entry_script: ENTRY_SCRIPT.to_string(),
        }
    }
}

impl PathTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Module script `index.html` should load, `/src/main.tsx` by default
    pub fn with_entry_script(mut self, entry_script: impl Into<String>) -> Self {
        self.entry_script = entry_script.into();
        self
    }

    pub fn translate(&self, file: SourceFile) -> Translation {
        let mut changes = Vec::new();
        let old_path = file.path.clone();
        let mut file = file;

        let rule = translate_path(&file.path);
        if let Some((target, rule)) = &rule {
            changes.push(format!("Moved {} to {}", old_path, target));
            file.rename(target);

            if matches!(rule, PathRule::EntryPage | PathRule::NestedPage) {
                if let Some(stripped) = strip_client_directive(&file.content) {
                    file.content = stripped;
                    changes.push("Removed 'use client' directive".to_string());
                }
            }
        }

        if file.path == "index.html" {
            file.content = rewrite_entry_html(&file.content, &self.entry_script, &mut changes);
        }

        if file.is_script() {
            file.content = components::rewrite_framework_components(&file.content, &mut changes);
            file.content = rewrite_relative_imports(&old_path, &file.path, &file.content, &mut changes);
        }

        if !changes.is_empty() {
            debug!(path = %file.path, changes = changes.len(), "Translated file");
        }

        Translation {
            moved_from: rule.map(|_| old_path),
            file,
            changes,
        }
    }

    /// Translates every file; a moved file replaces any file already at its target
    pub fn translate_all(&self, files: FileSet) -> (FileSet, Vec<Translation>) {
        let mut output = FileSet::new();
        let mut translations = Vec::new();

        for file in files {
            let translation = self.translate(file);
            if output.upsert(translation.file.clone()) {
                debug!(path = %translation.file.path, "Translated file replaced existing file");
            }
            if !translation.changes.is_empty() {
                translations.push(translation);
            }
        }

        (output, translations)
    }
}

/// Keeps relative imports pointing at their targets after either side moved
fn rewrite_relative_imports(
    old_path: &str,
    new_path: &str,
    content: &str,
    changes: &mut Vec<String>,
) -> String {
    let old_dir = parent_dir(old_path);
    let new_dir = parent_dir(new_path);
    let mut rewritten = 0;

    let output = relative_import_pattern().replace_all(content, |caps: &regex::Captures| {
        let specifier = &caps[3];
        let old_target = resolve_relative(old_dir, specifier);
        let new_target = translate_module_path(&old_target);

        if resolve_relative(new_dir, specifier) == new_target {
            return caps[0].to_string();
        }

        rewritten += 1;
        let new_specifier = relative_specifier(new_dir, &new_target);
        format!("{}{}{}{}", &caps[1], &caps[2], new_specifier, &caps[4])
    });

    if rewritten > 0 {
        changes.push(format!("Updated {} relative import(s)", rewritten));
    }
    output.into_owned()
}
