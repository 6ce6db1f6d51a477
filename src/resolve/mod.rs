//! Import resolution and stub generation
//!
//! Every relative (and `@/` aliased) import must point at a file in the set.
//! Imports that do not get a placeholder module so the project still builds;
//! each stub is reported because it is always worse than real content.

pub mod imports;
mod stubs;

pub use imports::{parse_imports, ImportBindings, ImportForm, ImportStatement};
pub use stubs::{generate_stub, role_for, stub_path, StubRole};

use crate::deps::{known_package, package_root};
use crate::project::{
    extension_of, parent_dir, resolve_relative, strip_extension, FileSet, SourceFile, SCRIPT_EXTENSIONS,
    SOURCE_ROOT,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

/// Asset types the runtime serves directly; imports of these never need a stub
const BINARY_ASSETS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "ico", "avif", "bmp", "woff", "woff2", "ttf", "otf", "eot",
    "mp3", "mp4", "webm", "wav", "ogg", "pdf",
];

/// A relative import as seen from one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReference {
    pub source_file: String,
    pub raw_specifier: String,
    /// Set once the target is known to exist (or a stub was generated for it)
    pub resolved_path: Option<String>,
    pub imported_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingImport {
    pub importing_file: String,
    pub specifier: String,
    /// Path the missing module would live at, extension included
    pub candidate_path: String,
    pub imported_name: String,
    #[serde(skip)]
    pub bindings: ImportBindings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub valid: bool,
    pub missing_imports: Vec<MissingImport>,
    /// Bare package imports that are not on the known-package table
    pub unsupported_packages: Vec<String>,
}

/// Result of resolving and then stubbing a file set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubReport {
    pub missing_imports: Vec<MissingImport>,
    pub stubs: Vec<String>,
    pub unsupported_packages: Vec<String>,
}

/// Membership set of module paths, with and without the source root and
/// with script extensions treated as interchangeable
#[derive(Debug, Clone, Default)]
pub struct ExistenceIndex {
    keys: HashSet<String>,
}

fn strip_source_root(path: &str) -> &str {
    path.strip_prefix(SOURCE_ROOT).unwrap_or(path)
}

fn is_script_ext(path: &str) -> bool {
    extension_of(path)
        .map(|ext| SCRIPT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

impl ExistenceIndex {
    pub fn build<'a>(files: impl IntoIterator<Item = &'a SourceFile>) -> Self {
        let mut index = Self::default();
        for file in files {
            index.insert(&file.path);
        }
        index
    }

    pub fn insert(&mut self, path: &str) {
        for variant in [path, strip_source_root(path)] {
            self.keys.insert(variant.to_string());
            if is_script_ext(variant) {
                let module = strip_extension(variant);
                self.keys.insert(module.to_string());
                if let Some(dir) = module.strip_suffix("/index") {
                    self.keys.insert(dir.to_string());
                }
            }
        }
    }

    /// Whether an import target (with or without extension) exists
    pub fn contains(&self, candidate: &str) -> bool {
        let candidate = candidate.trim_end_matches('/');
        if self.keys.contains(candidate) {
            return true;
        }
        is_script_ext(candidate) && self.keys.contains(strip_extension(candidate))
    }
}

/// Maps a relative or `@/` specifier to a virtual path, dropping any query
pub fn import_target(importing_file: &str, specifier: &str) -> Option<String> {
    let spec = specifier.split(['?', '#']).next().unwrap_or(specifier);
    if let Some(rest) = spec.strip_prefix("@/") {
        return Some(format!("{}{}", SOURCE_ROOT, rest));
    }
    if spec.starts_with('.') {
        return Some(resolve_relative(parent_dir(importing_file), spec));
    }
    None
}

fn is_binary_asset(path: &str) -> bool {
    extension_of(path)
        .map(|ext| BINARY_ASSETS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Import target with any script extension dropped
fn module_key(target: &str) -> String {
    if is_script_ext(target) {
        strip_extension(target).to_string()
    } else {
        target.to_string()
    }
}

fn fallback_name(target: &str) -> String {
    let stem = strip_extension(target.rsplit('/').next().unwrap_or(target));
    crate::project::pascal_case(stem)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImportResolver;

impl ImportResolver {
    pub fn new() -> Self {
        Self
    }

    /// Every relative import with its resolution state
    pub fn references(&self, files: &FileSet) -> Vec<ImportReference> {
        let index = ExistenceIndex::build(files);
        let mut references = Vec::new();

        for file in files.iter().filter(|f| f.is_script()) {
            for statement in parse_imports(&file.content) {
                let Some(target) = import_target(&file.path, &statement.specifier) else {
                    continue;
                };
                let resolved = (index.contains(&target) || is_binary_asset(&target)).then(|| target.clone());
                references.push(ImportReference {
                    source_file: file.path.clone(),
                    raw_specifier: statement.specifier.clone(),
                    resolved_path: resolved,
                    imported_name: statement
                        .bindings
                        .primary_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| fallback_name(&target)),
                });
            }
        }
        references
    }

    pub fn resolve(&self, files: &FileSet) -> ResolutionReport {
        let index = ExistenceIndex::build(files);
        // keyed by module, so `./button` seen from a .tsx and a .ts importer is one entry
        let mut pending: Vec<(String, String, MissingImport)> = Vec::new();
        let mut unsupported = BTreeSet::new();

        for file in files.iter().filter(|f| f.is_script()) {
            for statement in parse_imports(&file.content) {
                let Some(target) = import_target(&file.path, &statement.specifier) else {
                    if let Some(root) = package_root(&statement.specifier) {
                        if known_package(root).is_none() {
                            unsupported.insert(root.to_string());
                        }
                    }
                    continue;
                };
                if index.contains(&target) || is_binary_asset(&target) {
                    continue;
                }

                let key = module_key(&target);
                match pending.iter_mut().find(|(k, _, _)| *k == key) {
                    // one stub per module; later importers only add symbols
                    Some((_, _, existing)) => existing.bindings.merge(&statement.bindings),
                    None => pending.push((
                        key,
                        target.clone(),
                        MissingImport {
                            importing_file: file.path.clone(),
                            specifier: statement.specifier.clone(),
                            imported_name: statement
                                .bindings
                                .primary_name()
                                .map(str::to_string)
                                .unwrap_or_else(|| fallback_name(&target)),
                            candidate_path: String::new(),
                            bindings: statement.bindings.clone(),
                        },
                    )),
                }
            }
        }

        let missing: Vec<MissingImport> = pending
            .into_iter()
            .map(|(_, target, mut missing)| {
                missing.candidate_path = stub_path(&target, &missing.importing_file, &missing.bindings);
                missing
            })
            .collect();

        ResolutionReport {
            valid: missing.is_empty(),
            missing_imports: missing,
            unsupported_packages: unsupported.into_iter().collect(),
        }
    }

    /// Resolves imports and adds a stub for every distinct missing module
    pub fn resolve_and_stub(&self, files: &mut FileSet) -> StubReport {
        let report = self.resolve(files);
        let mut stubs = Vec::new();

        for missing in &report.missing_imports {
            // an earlier stub may already satisfy this import through another extension
            if ExistenceIndex::build(&*files).contains(&missing.candidate_path) {
                continue;
            }
            let stub = generate_stub(missing);
            debug!(
                path = %stub.path,
                imported_by = %missing.importing_file,
                role = ?role_for(&stub.path, &missing.imported_name),
                "Generated stub"
            );
            stubs.push(stub.path.clone());
            files.upsert(stub);
        }

        if !stubs.is_empty() {
            info!(stubs = stubs.len(), "Generated placeholder modules for missing imports");
        }

        StubReport {
            missing_imports: report.missing_imports,
            stubs,
            unsupported_packages: report.unsupported_packages,
        }
    }
}
