//! Dependency manifest reconciliation
//!
//! Adds every known package the code imports to `package.json` with its
//! pinned version. Existing entries are never removed, bumped or rewritten.

mod manifest;
mod packages;

pub use manifest::{DependencyManifest, ManifestError};
pub use packages::{is_builtin, known_package, package_root, KnownPackage, Section, KNOWN_PACKAGES};

use crate::project::{FileSet, SourceFile, MANIFEST_PATH};
use crate::resolve::imports::package_specifiers;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    /// No manifest existed; a minimal one was written
    pub manifest_created: bool,
    /// The existing manifest was unreadable and has been replaced
    pub manifest_recovered: bool,
    /// `(name, version)` pairs added to the manifest
    pub added: Vec<(String, String)>,
    /// Imported packages that are neither declared nor on the known table
    pub unknown_packages: Vec<String>,
}

impl DependencyReport {
    pub fn changed(&self) -> bool {
        self.manifest_created || self.manifest_recovered || !self.added.is_empty()
    }
}

/// Package roots imported by the script files, first occurrence order
pub fn imported_packages(files: &FileSet) -> Vec<String> {
    let mut roots: Vec<String> = Vec::new();
    for file in files.iter().filter(|f| f.is_script()) {
        for specifier in package_specifiers(&file.content) {
            if let Some(root) = package_root(&specifier) {
                if !roots.iter().any(|r| r == root) {
                    roots.push(root.to_string());
                }
            }
        }
    }
    roots
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DependencyReconciler;

impl DependencyReconciler {
    pub fn new() -> Self {
        Self
    }

    pub fn reconcile(&self, files: &mut FileSet) -> DependencyReport {
        let mut report = DependencyReport::default();

        let mut manifest = match files.get(MANIFEST_PATH) {
            None => {
                info!("No {} found, creating a minimal manifest", MANIFEST_PATH);
                report.manifest_created = true;
                DependencyManifest::synthesize()
            }
            Some(existing) => match DependencyManifest::parse(&existing.content) {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable {} and creating a minimal one", MANIFEST_PATH);
                    report.manifest_recovered = true;
                    DependencyManifest::synthesize()
                }
            },
        };

        for root in imported_packages(files) {
            if manifest.declares(&root) {
                continue;
            }
            match known_package(&root) {
                Some(pkg) => {
                    if manifest.add(pkg.section, pkg.name, pkg.version) {
                        debug!(package = pkg.name, version = pkg.version, "Added dependency");
                        report.added.push((pkg.name.to_string(), pkg.version.to_string()));
                    }
                }
                None => report.unknown_packages.push(root),
            }
        }

        if report.changed() {
            files.upsert(SourceFile::new(MANIFEST_PATH, manifest.to_json_string()));
        }
        if !report.added.is_empty() {
            info!(added = report.added.len(), "Updated {}", MANIFEST_PATH);
        }
        report
    }
}
