//! Parsing of fixer replies

use super::types::{EscalationError, EscalationResponse};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn fenced_json_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?[ \t]*\r?\n(.*?)\r?\n[ \t]*```").expect("Invalid fenced JSON regex"))
}

/// Finds the JSON object in a reply that may be wrapped in prose or a code fence
pub fn extract_json_from_response(response: &str) -> Result<String, EscalationError> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed.to_string());
    }

    if trimmed.contains("```") {
        if let Some(caps) = fenced_json_pattern().captures(trimmed) {
            let candidate = caps[1].trim();
            if candidate.starts_with('{') && serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                return Ok(candidate.to_string());
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return Ok(trimmed[start..=end].to_string());
        }
    }

    Err(EscalationError::MalformedResponse(
        "No JSON object found in response".to_string(),
    ))
}

pub fn parse_fixer_response(response: &str) -> Result<EscalationResponse, EscalationError> {
    debug!("Parsing fixer response ({} chars)", response.len());

    let json = extract_json_from_response(response)?;
    let mut parsed: EscalationResponse = serde_json::from_str(&json).map_err(|e| {
        warn!("Fixer JSON parse error: {}", e);
        EscalationError::MalformedResponse(format!(
            "{}: {}",
            e,
            json.chars().take(100).collect::<String>()
        ))
    })?;

    parsed.files = parsed
        .files
        .into_iter()
        .map(|mut escalated| {
            escalated.file = escalated.file.normalized();
            escalated
        })
        .collect();
    Ok(parsed)
}
