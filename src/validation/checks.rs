//! Individual defect checks; each returns human-readable messages

use crate::extract::contains_jsx;
use crate::project::{extension_of, strip_extension, MARKUP_EXTENSIONS};
use regex::Regex;
use std::sync::OnceLock;

use super::lexer::Balance;

fn bare_import_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*(?:import|export)\b[^'"\n;]*?\bfrom[ \t]+([A-Za-z@.][\w@/.\-]*)"#)
            .expect("Invalid bare import regex")
    })
}

fn elision_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?im)(?://|/\*|\{/\*|<!--)[^\n]*?(?:\.\.\.\s*(?:rest|remaining|existing|other|more|previous)\b|\brest of (?:the )?(?:code|file|component|implementation|content|styles)\b|\b(?:code|content|implementation)\s+(?:omitted|truncated)\b|\bomitted for brevity\b|\bsame as (?:before|above)\b|\bremains? (?:the )?(?:same|unchanged)\b|\bexisting code\b)",
        )
        .expect("Invalid elision regex")
    })
}

fn export_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*export\s|\bmodule\.exports\b|\bexports\.\w+\s*=")
            .expect("Invalid export regex")
    })
}

fn open_attribute_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<[A-Za-z][\w.\-]*(?:\s[^<>]*?)?\s[\w\-:]+=["'][^"'<>]*$"#)
            .expect("Invalid open attribute regex")
    })
}

fn open_tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"</?[A-Za-z][\w.\-]*(?:\s[^<>]*)?$").expect("Invalid open tag regex")
    })
}

pub fn has_export(content: &str) -> bool {
    export_pattern().is_match(content)
}

/// JSX files other than the `main`/`index` entry modules that render markup
/// or are named like a component
pub fn is_component_like(path: &str, content: &str) -> bool {
    let markup = extension_of(path)
        .map(|ext| MARKUP_EXTENSIONS.contains(&ext))
        .unwrap_or(false);
    if !markup {
        return false;
    }

    let stem = strip_extension(path.rsplit('/').next().unwrap_or(path));
    if matches!(stem, "main" | "index") {
        return false;
    }
    stem.starts_with(|c: char| c.is_ascii_uppercase()) || contains_jsx(content)
}

pub fn bare_imports(content: &str) -> Vec<String> {
    bare_import_pattern()
        .captures_iter(content)
        .map(|caps| format!("Unquoted module specifier '{}'", &caps[1]))
        .collect()
}

pub fn balance_messages(balance: &Balance) -> Vec<String> {
    let mut messages = Vec::new();
    let counts = [
        (balance.braces, "brace", '{', '}'),
        (balance.parens, "parenthesis", '(', ')'),
        (balance.brackets, "bracket", '[', ']'),
    ];
    for (count, name, open, close) in counts {
        if count > 0 {
            messages.push(format!("Unbalanced {}: {} unclosed '{}'", name, count, open));
        } else if count < 0 {
            messages.push(format!("Unbalanced {}: {} extra '{}'", name, -count, close));
        }
    }
    if let Some(closer) = balance.stray_closer {
        let already_reported = counts.iter().any(|(count, _, _, close)| *close == closer && *count < 0);
        if !already_reported {
            messages.push(format!("Unexpected '{}' before its opening counterpart", closer));
        }
    }
    if let Some(quote) = balance.open_quote {
        messages.push(format!("Unterminated {} string literal", quote));
    }
    if balance.open_comment {
        messages.push("Unterminated block comment".to_string());
    }
    messages
}

pub fn elision_markers(content: &str) -> Vec<String> {
    elision_pattern()
        .find_iter(content)
        .map(|m| {
            let line = content[..m.start()].matches('\n').count() + 1;
            format!("Placeholder comment on line {} marks omitted code", line)
        })
        .collect()
}

/// Truncation signatures on the final non-blank line
pub fn suspicious_ending(content: &str) -> Vec<String> {
    let mut messages = Vec::new();
    let trimmed = content.trim_end();
    let Some(last_line) = trimmed.lines().last() else {
        return messages;
    };

    if open_attribute_pattern().is_match(last_line) {
        messages.push("Attribute value left open at end of file".to_string());
    } else if open_tag_pattern().is_match(last_line) {
        messages.push("JSX tag left open on the final line".to_string());
    }

    if let Some(last) = trimmed.chars().last() {
        if matches!(last, '=' | '{' | '(' | '<') {
            messages.push(format!("File ends with '{}', likely truncated", last));
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        rest_of_code = { "// ... rest of the code" },
        rest_component = { "{/* rest of component */}" },
        existing = { "/* ... existing code ... */" },
        remains = { "// Footer remains the same" },
        omitted = { "<!-- content omitted for brevity -->" },
    )]
    fn test_elision_detected(line: &str) {
        assert_eq!(elision_markers(&format!("const a = 1;\n{}\n", line)).len(), 1);
    }

    #[test]
    fn test_plain_comments_not_elision() {
        let content = "// Render the rest of the list lazily\nconst items = [...rest];\n";
        assert!(elision_markers(content).is_empty());
    }

    #[parameterized(
        open_attr = { "  <div className=\"px-4", "Attribute value left open" },
        open_tag = { "return <Card title={t}", "JSX tag left open" },
        trailing_eq = { "const a =", "ends with '='" },
        trailing_paren = { "render(", "ends with '('" },
    )]
    fn test_suspicious_endings(content: &str, expected: &str) {
        let messages = suspicious_ending(content);
        assert!(messages.iter().any(|m| m.contains(expected)), "{:?}", messages);
    }

    #[test]
    fn test_clean_ending() {
        assert!(suspicious_ending("export default App;\n").is_empty());
        assert!(suspicious_ending("  return <div>{a > b}</div>;\n}\n").is_empty());
    }

    #[test]
    fn test_component_like() {
        assert!(is_component_like("src/components/Card.tsx", "const a = 1;"));
        assert!(is_component_like("src/pages/home.jsx", "return <div />;"));
        assert!(!is_component_like("src/main.tsx", "render(<App />)"));
        assert!(!is_component_like("src/lib/utils.ts", "export const a = 1;"));
    }

    #[test]
    fn test_has_export() {
        assert!(has_export("export default function A() {}"));
        assert!(has_export("const A = 1;\nexport { A };"));
        assert!(has_export("module.exports = {};"));
        assert!(!has_export("function A() {}\n// export later"));
    }
}
