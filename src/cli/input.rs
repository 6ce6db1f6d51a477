//! Loading command input and writing projects to disk

use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::io::Read;
use std::path::{Component, Path};
use tracing::{debug, info, warn};

use crate::project::SourceFile;

/// Directories never read when loading a project from disk
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", ".git"];

const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// What a command was pointed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectInput {
    /// Raw LLM output that still needs extraction
    Text(String),
    /// Files with known paths
    Files(Vec<SourceFile>),
}

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Reads a file, or stdin for `-`
pub fn read_text(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read input from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parses a JSON array of `{ path, content }` records.
///
/// Returns `None` for anything else so the text can be treated as LLM output.
pub fn parse_file_records(text: &str) -> Option<Vec<SourceFile>> {
    if !text.trim_start().starts_with('[') {
        return None;
    }
    serde_json::from_str::<Vec<SourceFile>>(text)
        .ok()
        .map(|files| files.into_iter().map(SourceFile::normalized).collect())
}

pub fn load_input(path: &Path) -> Result<ProjectInput> {
    if !is_stdin(path) && path.is_dir() {
        return load_directory(path).map(ProjectInput::Files);
    }

    let text = read_text(path)?;
    match parse_file_records(&text) {
        Some(files) => {
            debug!(files = files.len(), "Input is a JSON file list");
            Ok(ProjectInput::Files(files))
        }
        None => Ok(ProjectInput::Text(text)),
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

/// Reads every UTF-8 text file under `root`, skipping dependency and build
/// output directories. Files come back sorted by path.
pub fn load_directory(root: &Path) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let mut files = Vec::new();
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_global(false)
        .git_exclude(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| !SKIPPED_DIRS.contains(&name))
                .unwrap_or(true)
        })
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if size > MAX_FILE_SIZE {
            debug!(path = %path.display(), size, "Skipping large file");
            continue;
        }

        let Some(relative) = relative_path(root, path) else {
            warn!(path = %path.display(), "Skipping file with a non UTF-8 path");
            continue;
        };
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        match String::from_utf8(bytes) {
            Ok(content) => files.push(SourceFile::new(relative, content)),
            Err(_) => debug!(path = %relative, "Skipping binary file"),
        }
    }

    info!(files = files.len(), root = %root.display(), "Loaded project directory");
    Ok(files)
}

/// Writes files under `dir`, creating parent directories. Paths that would
/// escape `dir` are refused.
pub fn write_files(dir: &Path, files: &[SourceFile]) -> Result<usize> {
    for file in files {
        let relative = Path::new(&file.path);
        if file.path.is_empty() || relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            bail!("Refusing to write outside the output directory: {}", file.path);
        }

        let target = dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&target, &file.content).with_context(|| format!("Failed to write {}", target.display()))?;
        debug!(path = %target.display(), "Wrote file");
    }
    info!(files = files.len(), dir = %dir.display(), "Wrote project");
    Ok(files.len())
}
