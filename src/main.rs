use fencefix::cli::commands::{CliArgs, Commands};
use fencefix::cli::handlers::{handle_extract, handle_fix, handle_validate};
use fencefix::{FencefixConfig, NAME, VERSION};

use clap::Parser;
use std::env;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("fencefix v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Extract(extract_args) => handle_extract(extract_args, args.quiet).await,
        Commands::Fix(fix_args) => handle_fix(fix_args, args.quiet).await,
        Commands::Validate(validate_args) => handle_validate(validate_args).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = match &args.log_level {
            Some(level_str) => parse_level(level_str),
            None if args.verbose => Level::DEBUG,
            None if args.quiet => Level::ERROR,
            None => parse_level(&FencefixConfig::default().log_level),
        };

        tracing_subscriber::registry()
            .with(log_filter(env::var("RUST_LOG").ok().as_deref(), level))
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

/// `RUST_LOG` wins when set; otherwise only this crate logs, at `level`
fn log_filter(rust_log: Option<&str>, level: Level) -> EnvFilter {
    if let Some(spec) = rust_log.filter(|spec| !spec.trim().is_empty()) {
        match EnvFilter::try_new(spec) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Ignoring invalid RUST_LOG '{}': {}", spec, e),
        }
    }
    EnvFilter::new(format!("{}={}", NAME, level).to_lowercase())
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}
