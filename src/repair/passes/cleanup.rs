use crate::project::extension_of;
use crate::repair::{PassOutcome, RepairPass};
use regex::Regex;
use std::sync::OnceLock;

fn fence_line_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*```[\w+\-.]*[ \t]*(?:\r?\n|\z)").expect("Invalid fence line regex")
    })
}

fn blank_run_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n(?:[ \t]*\r?\n){3,}").expect("Invalid blank run regex"))
}

/// Leaked fence lines, long blank runs, and the trailing newline
pub struct CleanupPass;

impl RepairPass for CleanupPass {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    fn applies_to(&self, path: &str) -> bool {
        extension_of(path) != Some("md")
    }

    fn apply(&self, _path: &str, content: &str) -> PassOutcome {
        let mut fixes = Vec::new();

        let mut output = content.to_string();
        let fences = fence_line_pattern().find_iter(&output).count();
        if fences > 0 {
            output = fence_line_pattern().replace_all(&output, "").into_owned();
            fixes.push(format!("Removed {} leaked code fence line(s)", fences));
        }

        let runs = blank_run_pattern().find_iter(&output).count();
        if runs > 0 {
            output = blank_run_pattern().replace_all(&output, "\n\n").into_owned();
            fixes.push(format!("Collapsed {} run(s) of blank lines", runs));
        }

        let body = output.trim_end_matches(['\n', '\r']);
        if !body.trim().is_empty() {
            let terminated = format!("{}\n", body);
            if terminated != output {
                output = terminated;
                fixes.push("Normalized trailing newline".to_string());
            }
        }

        PassOutcome {
            content: output,
            fixes,
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fences_and_blank_runs() {
        let content = "```tsx\nconst a = 1;\n\n\n\n\nconst b = 2;\n```";
        let out = CleanupPass.apply("src/a.ts", content);
        assert_eq!(out.content, "const a = 1;\n\nconst b = 2;\n");
        assert_eq!(out.fixes.len(), 2);
        assert!(CleanupPass.apply("src/a.ts", &out.content).fixes.is_empty());
    }

    #[test]
    fn test_two_blank_lines_kept() {
        let content = "a\n\n\nb\n";
        assert_eq!(CleanupPass.apply("src/a.ts", content).content, content);
    }

    #[test]
    fn test_trailing_newlines_collapsed() {
        let out = CleanupPass.apply("src/index.css", "body {}\n\n\n");
        assert_eq!(out.content, "body {}\n");
    }

    #[test]
    fn test_markdown_skipped() {
        assert!(!CleanupPass.applies_to("README.md"));
        assert!(CleanupPass.applies_to("package.json"));
    }
}
