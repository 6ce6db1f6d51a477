//! Source file records flowing through the pipeline

use serde::{Deserialize, Serialize};

/// Extensions treated as script sources by the repair, resolve and validate stages
pub const SCRIPT_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js", "mjs", "cjs"];

/// Extensions that may contain JSX markup
pub const MARKUP_EXTENSIONS: &[&str] = &["tsx", "jsx", "js"];

/// A single file of the virtual project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Slash-separated virtual path, never with a leading slash
    pub path: String,
    /// Full file content
    pub content: String,
    /// Language tag derived from the extension
    #[serde(default)]
    pub language: String,
}

impl SourceFile {
    /// Creates a file, normalizing the path and inferring the language
    pub fn new(path: impl AsRef<str>, content: impl Into<String>) -> Self {
        let path = normalize_path(path.as_ref());
        let language = language_for_path(&path).to_string();
        Self {
            path,
            content: content.into(),
            language,
        }
    }

    /// Re-applies path normalization and fills in a missing language tag.
    ///
    /// Used on records that arrive deserialized from callers.
    pub fn normalized(mut self) -> Self {
        self.path = normalize_path(&self.path);
        if self.language.is_empty() {
            self.language = language_for_path(&self.path).to_string();
        }
        self
    }

    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.path)
    }

    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn is_script(&self) -> bool {
        self.extension()
            .map(|ext| SCRIPT_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }

    pub fn is_markup(&self) -> bool {
        self.extension()
            .map(|ext| MARKUP_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }

    /// Moves the file to a new path, updating the language tag
    pub fn rename(&mut self, new_path: &str) {
        self.path = normalize_path(new_path);
        self.language = language_for_path(&self.path).to_string();
    }
}

/// Normalizes a virtual path: forward slashes, no leading `/` or `./`, no empty segments
pub fn normalize_path(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

/// Returns the extension of a path without the dot
pub fn extension_of(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next()?;
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Strips the final extension from a path, if it has one
pub fn strip_extension(path: &str) -> &str {
    match extension_of(path) {
        Some(ext) => &path[..path.len() - ext.len() - 1],
        None => path,
    }
}

/// Maps a path's extension to the pipeline's language tag
pub fn language_for_path(path: &str) -> &'static str {
    match extension_of(path).map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("tsx") => "tsx",
        Some("ts") => "typescript",
        Some("jsx") => "jsx",
        Some("js") | Some("mjs") | Some("cjs") => "javascript",
        Some("css") => "css",
        Some("scss") => "scss",
        Some("json") => "json",
        Some("html") => "html",
        Some("md") => "markdown",
        Some("svg") => "svg",
        _ => "text",
    }
}
