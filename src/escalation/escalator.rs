use super::fixer::CodeFixer;
use super::types::{EscalationError, EscalationRequest, EscalationResponse};
use crate::project::{normalize_path, FileSet, SourceFile};
use crate::repair::Repairer;
use crate::validation::{validate, ValidationFinding};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Largest number of files sent in one fixer call
pub const MAX_BATCH_SIZE: usize = 15;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// What happened during one escalation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationSummary {
    pub fixer: String,
    pub batches: usize,
    pub sent: Vec<String>,
    pub accepted: Vec<String>,
    /// Returned files that were no better than the local version
    pub rejected: Vec<String>,
    pub scope_violations: Vec<String>,
    /// Batches that failed and fell back to the local files
    pub errors: Vec<String>,
    /// User-visible warnings (scope violations, fixer-reported errors)
    pub warnings: Vec<String>,
    pub aborted: bool,
}

/// Sends files with findings to a [`CodeFixer`] and keeps only improvements.
///
/// Any failure leaves the local files untouched.
pub struct Escalator {
    fixer: Arc<dyn CodeFixer>,
    repairer: Repairer,
    batch_size: usize,
    timeout: Duration,
    allowed_paths: Option<Vec<String>>,
}

impl Escalator {
    pub fn new(fixer: Arc<dyn CodeFixer>) -> Self {
        Self {
            fixer,
            repairer: Repairer::default(),
            batch_size: MAX_BATCH_SIZE,
            timeout: DEFAULT_TIMEOUT,
            allowed_paths: None,
        }
    }

    /// Clamped to `1..=MAX_BATCH_SIZE`
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables strict scope: only these paths are sent or accepted
    pub fn with_allowed_paths(mut self, allowed_paths: Vec<String>) -> Self {
        self.allowed_paths = Some(allowed_paths.iter().map(|p| normalize_path(p)).collect());
        self
    }

    fn in_scope(&self, path: &str) -> bool {
        self.allowed_paths
            .as_ref()
            .map(|allowed| allowed.iter().any(|p| p == path))
            .unwrap_or(true)
    }

    pub async fn escalate(
        &self,
        files: &mut FileSet,
        findings: &[ValidationFinding],
        cancel: &CancellationToken,
    ) -> EscalationSummary {
        let mut summary = EscalationSummary {
            fixer: self.fixer.name().to_string(),
            ..Default::default()
        };

        let candidates: Vec<&ValidationFinding> = findings
            .iter()
            .filter(|f| {
                let keep = self.in_scope(&f.path) && files.contains(&f.path);
                if !keep {
                    debug!(path = %f.path, "Not escalating file outside scope");
                }
                keep
            })
            .collect();

        for batch in candidates.chunks(self.batch_size) {
            if cancel.is_cancelled() {
                summary.aborted = true;
                break;
            }

            let request = self.build_request(files, batch);
            summary.batches += 1;
            summary.sent.extend(request.files.iter().map(|f| f.path.clone()));

            match self.call_fixer(request, cancel).await {
                Ok(response) => self.apply_response(files, batch, response, &mut summary),
                Err(EscalationError::Aborted) => {
                    info!("Escalation aborted, keeping locally repaired files");
                    summary.aborted = true;
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Escalation batch failed, keeping locally repaired files");
                    summary.errors.push(e.to_string());
                }
            }
        }

        summary
    }

    fn build_request(&self, files: &FileSet, batch: &[&ValidationFinding]) -> EscalationRequest {
        let outgoing: Vec<SourceFile> = batch
            .iter()
            .filter_map(|finding| files.get(&finding.path).cloned())
            .collect();
        let request = EscalationRequest::new(outgoing)
            .with_findings(batch.iter().map(|f| (*f).clone()).collect());

        match &self.allowed_paths {
            Some(allowed) => request.with_scope(allowed.clone()).scoped(),
            None => request,
        }
    }

    async fn call_fixer(
        &self,
        request: EscalationRequest,
        cancel: &CancellationToken,
    ) -> Result<EscalationResponse, EscalationError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(EscalationError::Aborted),
            result = tokio::time::timeout(self.timeout, self.fixer.fix(request)) => match result {
                Ok(response) => response,
                Err(_) => Err(EscalationError::Timeout { seconds: self.timeout.as_secs() }),
            },
        }
    }

    fn apply_response(
        &self,
        files: &mut FileSet,
        batch: &[&ValidationFinding],
        response: EscalationResponse,
        summary: &mut EscalationSummary,
    ) {
        if let Some(error) = response.error {
            warn!(fixer = %summary.fixer, error = %error, "Fixer reported an error");
            summary.warnings.push(format!("Fixer reported: {}", error));
        }

        for escalated in response.files {
            let path = escalated.file.path.clone();

            if !self.in_scope(&path) {
                warn!(path = %path, "Fixer returned a file outside the allowed paths, dropping it");
                summary.warnings.push(format!("Dropped out-of-scope file returned by fixer: {}", path));
                summary.scope_violations.push(path);
                continue;
            }

            let Some(local_finding) = batch.iter().find(|f| f.path == path) else {
                warn!(path = %path, "Fixer returned a file that was not sent, ignoring it");
                summary.warnings.push(format!("Ignored unrequested file returned by fixer: {}", path));
                continue;
            };

            let unchanged = files
                .get(&path)
                .map(|local| local.content == escalated.file.content)
                .unwrap_or(false);
            if unchanged {
                debug!(path = %path, was_fixed = escalated.was_fixed, "Fixer left file unchanged");
                continue;
            }

            let repaired = self.repairer.repair(&path, &escalated.file.content);
            let remaining = validate(&repaired.content, &path).errors.len();

            if remaining == 0 || remaining < local_finding.messages.len() {
                info!(
                    path = %path,
                    before = local_finding.messages.len(),
                    after = remaining,
                    "Accepted escalated file"
                );
                files.upsert(SourceFile::new(&path, repaired.content));
                summary.accepted.push(path);
            } else {
                info!(
                    path = %path,
                    before = local_finding.messages.len(),
                    after = remaining,
                    "Escalated file is no better, keeping local version"
                );
                summary.rejected.push(path);
            }
        }
    }
}
