//! Prompts for the LLM-backed fixer

use super::types::EscalationRequest;
use serde_json::json;

pub const SYSTEM_PROMPT: &str = r#"You repair React/Vite source files that a code generator left broken.

Each file you receive failed a syntax check. The findings for every file are listed next to it.

Rules:
1. Fix only what the findings describe and anything needed to make the file parse
2. Return the COMPLETE content of every file you change - never elide code with comments like "rest unchanged"
3. Keep paths exactly as given; do not rename, add or remove files
4. Do not introduce new npm packages
5. Keep the existing component structure and exports

Answer with a single JSON object and nothing else:
{
  "files": [
    { "path": "src/App.tsx", "content": "...", "wasFixed": true, "fixes": ["closed unterminated <div>"] }
  ]
}

Set "wasFixed" to false and return the content unchanged when you cannot fix a file. If you cannot process the request at all, answer {"files": [], "error": "<reason>"}."#;

/// User message carrying the files and their findings
pub fn build_user_prompt(request: &EscalationRequest) -> String {
    let files: Vec<serde_json::Value> = request
        .files
        .iter()
        .map(|file| {
            let findings: Vec<&String> = request
                .findings
                .iter()
                .filter(|f| f.path == file.path)
                .flat_map(|f| f.messages.iter())
                .collect();
            json!({
                "path": file.path,
                "language": file.language,
                "findings": findings,
                "content": file.content,
            })
        })
        .collect();

    let payload = serde_json::to_string_pretty(&json!({ "files": files })).unwrap_or_default();
    let mut prompt = format!("Repair these {} file(s):\n\n{}", request.files.len(), payload);
    if request.strict_scope {
        prompt.push_str("\n\nOnly these paths may appear in your answer: ");
        prompt.push_str(&request.allowed_paths.join(", "));
    }
    prompt
}
