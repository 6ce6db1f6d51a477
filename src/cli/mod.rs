pub mod commands;
pub mod handlers;
pub mod input;
pub mod output;

pub use commands::{CliArgs, Commands, ExtractArgs, FixArgs, OutputFormatArg, ValidateArgs};
pub use input::{load_directory, load_input, write_files, ProjectInput};
pub use output::{OutputFormat, OutputFormatter};
