use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// Turns raw LLM output into a buildable Vite + React project
#[derive(Parser, Debug)]
#[command(
    name = "fencefix",
    about = "Turns raw LLM output into a buildable Vite + React project",
    version,
    author,
    long_about = "fencefix extracts files from fenced code blocks in LLM output, translates \
                  framework conventions to a Vite layout, repairs common syntax damage, stubs \
                  missing imports and reconciles package.json. Files that still fail validation \
                  can optionally be escalated to an LLM fixer (Ollama, OpenAI, Claude, Gemini, \
                  Grok, Groq)."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Extract files from LLM output",
        long_about = "Splits LLM output into files using fenced code blocks, path markers and \
                      the text preceding each block. No other stage runs.\n\n\
                      Examples:\n  \
                      fencefix extract response.md\n  \
                      cat response.md | fencefix extract - --format json\n  \
                      fencefix extract response.md --output-dir ./app"
    )]
    Extract(ExtractArgs),

    #[command(
        about = "Run the full repair pipeline",
        long_about = "Runs extraction (text input only), path translation, syntax repair, import \
                      stubbing, dependency reconciliation and validation. With --escalate, files \
                      that still have findings are sent to an LLM fixer.\n\n\
                      Examples:\n  \
                      fencefix fix response.md --output-dir ./app\n  \
                      fencefix fix ./my-project --format json\n  \
                      fencefix fix files.json --escalate --backend ollama --model qwen2.5-coder:7b"
    )]
    Fix(FixArgs),

    #[command(
        about = "Validate files without changing them",
        long_about = "Runs only the validator. Exits with status 1 when any finding is produced.\n\n\
                      Examples:\n  \
                      fencefix validate ./my-project\n  \
                      fencefix validate src/App.tsx --format json"
    )]
    Validate(ValidateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(value_name = "INPUT", help = "LLM output file, or '-' for stdin")]
    pub input: PathBuf,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write extracted files under this directory"
    )]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct FixArgs {
    #[arg(
        value_name = "INPUT",
        help = "LLM output file, JSON array of files, project directory, or '-' for stdin"
    )]
    pub input: PathBuf,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write the repaired project under this directory"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Send files that still fail validation to an LLM fixer")]
    pub escalate: bool,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "LLM provider for escalation (overrides FENCEFIX_PROVIDER)"
    )]
    pub backend: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name (provider-specific, e.g. 'qwen2.5-coder:7b' for Ollama)"
    )]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Timeout per fixer call in seconds")]
    pub timeout: Option<u64>,

    #[arg(
        long,
        requires = "allow",
        help = "Reject fixer output for paths outside the --allow list"
    )]
    pub strict_scope: bool,

    #[arg(
        long,
        value_name = "PATH",
        num_args = 1..,
        help = "Paths the fixer may return under --strict-scope"
    )]
    pub allow: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(
        value_name = "INPUT",
        help = "Source file, LLM output file, JSON array of files, project directory, or '-'"
    )]
    pub input: PathBuf,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    crate::config::parse_provider(s).map_err(|e| e.to_string())
}
