//! File extraction from raw LLM output
//!
//! Scans markdown-ish assistant text for fenced code blocks and turns each
//! non-empty block into a [`SourceFile`]. The path of a block is decided by
//! the first rule that produces one:
//!
//! 1. a marker comment on the block's first line (`// src/App.tsx`,
//!    `{/* src/App.tsx */}`, `<!-- index.html -->`, ...)
//! 2. a path in the fence info string (```` ```tsx src/App.tsx ````)
//! 3. a path mentioned in the prose between the previous block and this one
//! 4. the block's exported symbol (`export default function Hero` →
//!    `src/components/Hero.tsx`)
//! 5. a synthetic unique name derived from the language tag
//!
//! Only single-level fences are recognized: a fence nested inside another
//! fence closes the outer one.

mod inference;
mod markers;

pub use inference::{contains_jsx, exported_symbol, extension_for_language, is_hook_name};
pub use markers::as_path;

use crate::project::{strip_extension, extension_of, SourceFile};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

/// Where an extracted file's path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Marker,
    InfoString,
    Context,
    Inferred,
    Synthetic,
}

impl PathSource {
    /// Explicit paths were written by the model; the rest were guessed
    pub fn is_explicit(self) -> bool {
        matches!(
            self,
            PathSource::Marker | PathSource::InfoString | PathSource::Context
        )
    }
}

/// One extracted block with provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub file: SourceFile,
    pub path_source: PathSource,
    /// Fence language tag as written (lowercased)
    pub fence_language: String,
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*```([^\r\n`]*)\r?\n((?s:.*?))(?:^[ \t]*```[ \t]*\r?$|\z)")
            .expect("Invalid fence regex")
    })
}

/// Extracts source files from fenced code blocks
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts files in document order
    pub fn extract(&self, text: &str) -> Vec<SourceFile> {
        self.extract_detailed(text)
            .into_iter()
            .map(|extracted| extracted.file)
            .collect()
    }

    /// Extracts files together with the rule that named each one
    pub fn extract_detailed(&self, text: &str) -> Vec<ExtractedFile> {
        let mut files: Vec<ExtractedFile> = Vec::new();
        let mut previous_end = 0;

        for caps in fence_pattern().captures_iter(text) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            let info = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let preceding = &text[previous_end..whole.start()];
            previous_end = whole.end();

            let (language, info_path) = markers::parse_info_string(info);
            let body = body.as_str().replace("\r\n", "\n");
            let body = body.trim_end_matches(['\n', '\r']);

            let (path, content, path_source) = match markers::take_marker(body) {
                Some((path, rest)) => (path, rest, PathSource::Marker),
                None => {
                    let content = body.to_string();
                    if let Some(path) = info_path {
                        (path, content, PathSource::InfoString)
                    } else if let Some(path) = markers::path_from_context(preceding) {
                        (path, content, PathSource::Context)
                    } else if let Some(path) = inference::infer_path(&language, body) {
                        (path, content, PathSource::Inferred)
                    } else {
                        (
                            inference::synthetic_path(&language),
                            content,
                            PathSource::Synthetic,
                        )
                    }
                }
            };

            if content.trim().is_empty() {
                debug!(path = %path, "Skipping empty code block");
                continue;
            }

            let file = SourceFile::new(&path, content);
            self.push(&mut files, file, path_source, language);
        }

        debug!(count = files.len(), "Extracted files from text");
        files
    }

    fn push(
        &self,
        files: &mut Vec<ExtractedFile>,
        mut file: SourceFile,
        path_source: PathSource,
        fence_language: String,
    ) {
        if let Some(existing) = files.iter_mut().find(|f| f.file.path == file.path) {
            if path_source.is_explicit() {
                debug!(path = %file.path, "Later block replaces earlier block with same path");
                existing.file = file;
                existing.path_source = path_source;
                existing.fence_language = fence_language;
                return;
            }

            let taken: HashSet<&str> = files.iter().map(|f| f.file.path.as_str()).collect();
            let unique = disambiguate(&file.path, &taken);
            debug!(from = %file.path, to = %unique, "Renaming colliding inferred path");
            file.rename(&unique);
        }

        files.push(ExtractedFile {
            file,
            path_source,
            fence_language,
        });
    }
}

fn disambiguate(path: &str, taken: &HashSet<&str>) -> String {
    let stem = strip_extension(path);
    let ext = extension_of(path);
    (2..)
        .map(|n| match ext {
            Some(ext) => format!("{}{}.{}", stem, n, ext),
            None => format!("{}{}", stem, n),
        })
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| path.to_string())
}

/// Convenience wrapper around [`FileExtractor::extract`]
pub fn extract_files(text: &str) -> Vec<SourceFile> {
    FileExtractor::new().extract(text)
}
