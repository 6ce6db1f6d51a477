//! Escalation of unrepaired files to an external fixer
//!
//! Local repair always produces a usable project; escalation only ever
//! replaces a file with a strictly better version of it.

mod escalator;
mod fixer;
mod prompt;
mod response;
mod types;

pub use escalator::{EscalationSummary, Escalator, DEFAULT_TIMEOUT, MAX_BATCH_SIZE};
pub use fixer::{CodeFixer, LlmFixer};
pub use response::{extract_json_from_response, parse_fixer_response};
pub use types::{EscalatedFile, EscalationError, EscalationRequest, EscalationResponse};
