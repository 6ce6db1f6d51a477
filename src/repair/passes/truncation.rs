use crate::markup::is_void_element;
use crate::repair::{is_markup_path, PassOutcome, RepairPass};
use regex::Regex;
use std::sync::OnceLock;

/// A line that ends inside an attribute value whose quote never closes
fn open_attribute_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(.*<([A-Za-z][\w.\-]*)(?:\s[^<>]*?)?\s[\w\-:]+=)(["'])([^"'<>{}]*)$"#)
            .expect("Invalid open attribute regex")
    })
}

/// Closes a quote and tag cut off at the end of a line.
///
/// Only fires when the next line is blank or starts a new tag; a truncated
/// last line has no context to confirm the closure and is left for the validator.
pub struct TruncationPass;

impl RepairPass for TruncationPass {
    fn name(&self) -> &'static str {
        "truncation"
    }

    fn applies_to(&self, path: &str) -> bool {
        is_markup_path(path)
    }

    fn apply(&self, _path: &str, content: &str) -> PassOutcome {
        let lines: Vec<&str> = content.split('\n').collect();
        let mut output: Vec<String> = Vec::with_capacity(lines.len());
        let mut closed = 0;

        for (idx, line) in lines.iter().enumerate() {
            let next = lines.get(idx + 1).map(|l| l.trim());
            let unambiguous = match next {
                // content ending in '\n' leaves an empty last segment that is not a line
                Some("") => idx + 2 < lines.len(),
                Some(next) => next.starts_with('<'),
                None => false,
            };

            let body = line.trim_end_matches('\r');
            let repaired = if unambiguous {
                open_attribute_pattern().captures(body).map(|caps| {
                    let closer = if is_void_element(&caps[2]) { " />" } else { ">" };
                    format!("{}{}{}{}{}", &caps[1], &caps[3], &caps[4], &caps[3], closer)
                })
            } else {
                None
            };

            match repaired {
                Some(fixed) => {
                    closed += 1;
                    output.push(fixed);
                }
                None => output.push(line.to_string()),
            }
        }

        if closed == 0 {
            return PassOutcome::unchanged(content);
        }
        PassOutcome::unchanged(&output.join("\n"))
            .with_fix(format!("Closed {} truncated attribute(s) and tag(s)", closed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closes_before_new_tag() {
        let content = "  <div className=\"px-4\n  <p>Hello</p>\n";
        let out = TruncationPass.apply("src/A.tsx", content);
        assert_eq!(out.content, "  <div className=\"px-4\">\n  <p>Hello</p>\n");
        assert_eq!(out.fixes.len(), 1);
    }

    #[test]
    fn test_closes_before_blank_line() {
        let content = "<img src=\"/logo.png\n\n<h1>Hi</h1>\n";
        let out = TruncationPass.apply("src/A.tsx", content);
        assert_eq!(out.content, "<img src=\"/logo.png\" />\n\n<h1>Hi</h1>\n");
    }

    #[test]
    fn test_last_line_left_alone() {
        for content in ["  <div className=\"px-4", "  <div className=\"px-4\n"] {
            let out = TruncationPass.apply("src/A.tsx", content);
            assert_eq!(out.content, content);
            assert!(out.fixes.is_empty());
        }
    }

    #[test]
    fn test_ambiguous_continuation_left_alone() {
        let content = "<div className=\"px-4\n  py-2\">x</div>\n";
        assert!(TruncationPass.apply("src/A.tsx", content).fixes.is_empty());
    }

    #[test]
    fn test_closed_attribute_untouched() {
        let content = "<div className=\"px-4\"\n  <p>x</p>\n";
        assert!(TruncationPass.apply("src/A.tsx", content).fixes.is_empty());
    }
}
