//! Subcommand handlers. Each returns the process exit code.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::commands::{ExtractArgs, FixArgs, ValidateArgs};
use super::input::{is_stdin, load_input, write_files, ProjectInput};
use super::output::OutputFormatter;
use crate::config::{default_model, FencefixConfig};
use crate::extract::FileExtractor;
use crate::pipeline::{PipelineOrchestrator, PipelineOutput};
use crate::progress::LoggingHandler;
use crate::project::{extension_of, SourceFile, SCRIPT_EXTENSIONS};
use crate::validation::validate_files;

pub async fn handle_extract(args: &ExtractArgs, quiet: bool) -> i32 {
    match run_extract(args, quiet) {
        Ok(code) => code,
        Err(e) => {
            error!("Extraction failed: {:#}", e);
            1
        }
    }
}

fn run_extract(args: &ExtractArgs, quiet: bool) -> Result<i32> {
    let files = match load_input(&args.input)? {
        ProjectInput::Text(text) => FileExtractor::new().extract(&text),
        ProjectInput::Files(files) => {
            info!("Input is already a file list, nothing to extract");
            files
        }
    };

    if let Some(dir) = &args.output_dir {
        write_files(dir, &files)?;
    }
    if !(quiet && args.output_dir.is_some()) {
        let formatter = OutputFormatter::new(args.format.into());
        println!("{}", formatter.format_files(&files)?);
    }
    Ok(0)
}

pub async fn handle_fix(args: &FixArgs, quiet: bool) -> i32 {
    match run_fix(args, quiet).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fix failed: {:#}", e);
            1
        }
    }
}

/// Applies command-line overrides on top of the environment configuration
pub fn fix_config(args: &FixArgs) -> FencefixConfig {
    let mut config = FencefixConfig::default();
    if let Some(provider) = args.backend {
        config.provider = provider;
        if args.model.is_none() {
            config.model = default_model(provider).to_string();
        }
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.escalation_timeout_secs = timeout;
    }
    if args.escalate {
        config.escalate = true;
    }
    config
}

fn build_orchestrator(args: &FixArgs) -> Result<PipelineOrchestrator> {
    let config = fix_config(args);
    config.validate()?;
    debug!("{}", config);

    let mut pipeline_config = config.pipeline_config();
    if args.strict_scope {
        pipeline_config = pipeline_config.with_strict_scope(args.allow.clone());
    }

    let mut orchestrator = PipelineOrchestrator::new(pipeline_config).with_progress(Arc::new(LoggingHandler));
    if config.escalate {
        let fixer = config
            .create_fixer()
            .context("Failed to initialize the escalation fixer")?;
        info!(
            "Escalation enabled: {} ({})",
            config.provider.as_str(),
            config.model
        );
        orchestrator = orchestrator.with_fixer(fixer);
    }
    Ok(orchestrator)
}

async fn run_fix(args: &FixArgs, quiet: bool) -> Result<i32> {
    let orchestrator = build_orchestrator(args)?;

    let cancel = orchestrator.cancellation_token();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, aborting escalation");
            cancel.cancel();
        }
    });

    let result = match load_input(&args.input)? {
        ProjectInput::Text(text) => orchestrator.run_text(&text).await,
        ProjectInput::Files(files) => orchestrator.run_files(files).await,
    };
    watcher.abort();
    let output: PipelineOutput = result?;

    if let Some(dir) = &args.output_dir {
        write_files(dir, &output.files)?;
    }
    if !(quiet && args.output_dir.is_some()) {
        let formatter = OutputFormatter::new(args.format.into());
        println!("{}", formatter.format_pipeline(&output)?);
    }

    if !output.report.is_clean() {
        warn!(
            "{} file(s) still have findings",
            output.report.findings.len()
        );
    }
    Ok(0)
}

pub async fn handle_validate(args: &ValidateArgs) -> i32 {
    match run_validate(args) {
        Ok(code) => code,
        Err(e) => {
            error!("Validation failed: {:#}", e);
            1
        }
    }
}

fn is_source_path(path: &Path) -> bool {
    path.to_str()
        .and_then(extension_of)
        .map(|ext| ext == "json" || SCRIPT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Files to validate for an input. A single source file is validated as
/// itself; other text is treated as LLM output and extracted first.
pub fn validation_targets(path: &Path, input: ProjectInput) -> Vec<SourceFile> {
    match input {
        ProjectInput::Files(files) => files,
        ProjectInput::Text(text) => {
            if !is_stdin(path) && is_source_path(path) {
                return vec![SourceFile::new(path.to_string_lossy(), text)];
            }
            let extracted = FileExtractor::new().extract(&text);
            if extracted.is_empty() {
                debug!("No fenced blocks found, validating input as a single file");
                vec![SourceFile::new(path.to_string_lossy(), text)]
            } else {
                extracted
            }
        }
    }
}

fn run_validate(args: &ValidateArgs) -> Result<i32> {
    let input = load_input(&args.input)?;
    let files = validation_targets(&args.input, input);
    let findings = validate_files(&files);

    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format_findings(&findings, files.len())?);

    if findings.is_empty() {
        Ok(0)
    } else {
        info!("{} of {} file(s) failed validation", findings.len(), files.len());
        Ok(1)
    }
}
