//! Path discovery from in-block markers, fence info strings, and surrounding prose

use crate::project::{extension_of, normalize_path};
use regex::Regex;
use std::sync::OnceLock;

/// Extensions accepted when deciding whether a token names a file
const PATH_EXTENSIONS: &[&str] = &[
    "tsx", "ts", "jsx", "js", "mjs", "cjs", "css", "scss", "json", "html", "md", "svg", "env",
    "txt", "yml", "yaml",
];

/// Returns the normalized path if `candidate` looks like a project file path
pub fn as_path(candidate: &str) -> Option<String> {
    let cleaned = candidate
        .trim()
        .trim_matches(|c| matches!(c, '`' | '"' | '\'' | '*'))
        .trim_end_matches(':');

    if cleaned.is_empty() || cleaned.chars().any(char::is_whitespace) {
        return None;
    }
    if cleaned.contains("://") {
        return None;
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || "_@.-/[]()+".contains(c);
    if !cleaned.chars().all(allowed) {
        return None;
    }

    let ext = extension_of(cleaned)?.to_ascii_lowercase();
    if !PATH_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }

    let normalized = normalize_path(cleaned);
    if normalized.is_empty() || normalized.split('/').any(|s| s == "..") {
        return None;
    }
    Some(normalized)
}

fn marker_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let label = r"(?:(?i:file(?:name)?|path)\s*:\s*)?";
        [
            r"^/\*\*\s*@file\s+(\S+?)\s*\*/$".to_string(),
            format!(r"^\{{/\*\s*{label}(\S+?)\s*\*/\}}$"),
            format!(r"^/\*\s*{label}(\S+?)\s*\*/$"),
            format!(r"^<!--\s*{label}(\S+?)\s*-->$"),
            format!(r"^//\s*{label}(\S+)$"),
            format!(r"^#\s*{label}(\S+)$"),
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid marker regex"))
        .collect()
    })
}

/// Looks for a path marker on the first non-blank line of a block body.
///
/// Returns the path and the body with the marker line removed.
pub fn take_marker(body: &str) -> Option<(String, String)> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            offset += line.len();
            continue;
        }

        let path = marker_patterns()
            .iter()
            .find_map(|re| re.captures(trimmed))
            .and_then(|caps| caps.get(1))
            .and_then(|m| as_path(m.as_str()))?;

        let mut remaining = String::with_capacity(body.len());
        remaining.push_str(&body[..offset]);
        remaining.push_str(&body[offset + line.len()..]);
        return Some((path, remaining));
    }
    None
}

/// Splits a fence info string into its language tag and an optional embedded path.
///
/// Handles ```` ```tsx ````, ```` ```tsx src/App.tsx ````, ```` ```tsx:src/App.tsx ````,
/// ```` ```tsx title="src/App.tsx" ```` and ```` ```src/App.tsx ````.
pub fn parse_info_string(info: &str) -> (String, Option<String>) {
    let info = info.trim();
    if info.is_empty() {
        return (String::new(), None);
    }

    let mut tokens = info
        .split(|c: char| c.is_whitespace() || c == ':')
        .filter(|t| !t.is_empty());
    let first = tokens.next().unwrap_or_default();

    if let Some(path) = as_path(first) {
        let language = extension_of(&path).unwrap_or_default().to_ascii_lowercase();
        return (language, Some(path));
    }

    let language = first.to_ascii_lowercase();
    let path = tokens.find_map(|token| {
        let value = token
            .split_once('=')
            .map(|(_, value)| value)
            .unwrap_or(token);
        as_path(value)
    });
    (language, path)
}

fn hint_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"\*\*([^*\n]+?)\*\*",
            r"`([^`\n]+)`",
            r#""([^"\n]+)""#,
            r"(?m):[ \t]*([^\s:]+)[ \t]*$",
            r"(?m)^#{1,6}[ \t]+(.+?)[ \t]*$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid hint regex"))
        .collect()
    })
}

/// Finds the file path mentioned closest to the end of the prose preceding a block
pub fn path_from_context(text: &str) -> Option<String> {
    let mut best: Option<(usize, String)> = None;

    for re in hint_patterns() {
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(path) = last_path_token(inner.as_str()) else {
                continue;
            };
            if best.as_ref().map_or(true, |(end, _)| whole.end() >= *end) {
                best = Some((whole.end(), path));
            }
        }
    }

    best.map(|(_, path)| path)
}

fn last_path_token(text: &str) -> Option<String> {
    text.split_whitespace().rev().find_map(as_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        line_comment = { "// src/components/Hero.tsx\nexport default 1;\n" },
        labeled = { "// File: src/components/Hero.tsx\nexport default 1;\n" },
        hash = { "# src/components/Hero.tsx\nexport default 1;\n" },
        block = { "/* src/components/Hero.tsx */\nexport default 1;\n" },
        jsx_comment = { "{/* src/components/Hero.tsx */}\nexport default 1;\n" },
        html_comment = { "<!-- src/components/Hero.tsx -->\nexport default 1;\n" },
        jsdoc_file = { "/** @file src/components/Hero.tsx */\nexport default 1;\n" },
        leading_blank = { "\n// /src/components/Hero.tsx\nexport default 1;\n" },
    )]
    fn test_marker_styles(body: &str) {
        let (path, rest) = take_marker(body).expect("marker should be found");
        assert_eq!(path, "src/components/Hero.tsx");
        assert!(rest.contains("export default 1;"));
        assert!(!rest.contains("Hero.tsx"));
    }

    #[test]
    fn test_marker_requires_path_shape() {
        assert!(take_marker("// render the hero section\nconst x = 1;\n").is_none());
        assert!(take_marker("# Title\ntext\n").is_none());
        assert!(take_marker("const x = 1; // a.tsx\n").is_none());
    }

    #[test]
    fn test_info_string() {
        assert_eq!(parse_info_string("tsx"), ("tsx".to_string(), None));
        assert_eq!(
            parse_info_string("tsx src/App.tsx"),
            ("tsx".to_string(), Some("src/App.tsx".to_string()))
        );
        assert_eq!(
            parse_info_string("tsx:src/App.tsx"),
            ("tsx".to_string(), Some("src/App.tsx".to_string()))
        );
        assert_eq!(
            parse_info_string(r#"jsx title="src/Nav.jsx""#),
            ("jsx".to_string(), Some("src/Nav.jsx".to_string()))
        );
        assert_eq!(
            parse_info_string("src/index.css"),
            ("css".to_string(), Some("src/index.css".to_string()))
        );
    }

    #[parameterized(
        bold = { "Here is the header:\n\n**src/components/Header.tsx**\n" },
        backtick = { "Create `src/components/Header.tsx` with:\n" },
        quoted = { "Save this as \"src/components/Header.tsx\"\n" },
        colon = { "Header component: src/components/Header.tsx\n" },
        heading = { "### src/components/Header.tsx\n" },
        bold_backtick = { "**`src/components/Header.tsx`**\n" },
    )]
    fn test_context_hints(text: &str) {
        assert_eq!(
            path_from_context(text).as_deref(),
            Some("src/components/Header.tsx")
        );
    }

    #[test]
    fn test_context_prefers_closest_hint() {
        let text = "First update `src/App.tsx`, then add the new file `src/components/Nav.tsx`:\n";
        assert_eq!(
            path_from_context(text).as_deref(),
            Some("src/components/Nav.tsx")
        );
    }

    #[test]
    fn test_context_without_path() {
        assert!(path_from_context("Here is the updated code:\n").is_none());
        assert!(path_from_context("See https://example.com/app.js for details").is_none());
    }

    #[test]
    fn test_as_path_rejects_parent_segments() {
        assert!(as_path("../secret.ts").is_none());
        assert_eq!(as_path("./src/a.ts").as_deref(), Some("src/a.ts"));
    }
}
