use crate::repair::{is_script_path, PassOutcome, RepairPass};
use crate::translate::strip_client_directive;
use regex::Regex;
use std::sync::OnceLock;

/// `import X from react` / `export { a } from ./b`
fn bare_specifier_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^([ \t]*(?:import|export)\b[^'"\n;]*?\bfrom[ \t]+)([A-Za-z@.][\w@/.\-]*)([ \t]*;?)[ \t]*$"#,
        )
        .expect("Invalid bare specifier regex")
    })
}

/// Single-line import/export statements, and the `} from '...'` tail of
/// multi-line ones, that end at a quote with no terminator
fn unterminated_import_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^([ \t]*(?:(?:import|export)\b[^'"\n;]*?\bfrom[ \t]*|import[ \t]*|\}[ \t]*from[ \t]*)(?:'[^'\n]+'|"[^"\n]+"))[ \t]*$"#,
        )
        .expect("Invalid unterminated import regex")
    })
}

pub struct ImportHygienePass;

impl RepairPass for ImportHygienePass {
    fn name(&self) -> &'static str {
        "import-hygiene"
    }

    fn applies_to(&self, path: &str) -> bool {
        is_script_path(path)
    }

    fn apply(&self, _path: &str, content: &str) -> PassOutcome {
        let mut fixes = Vec::new();

        let mut quoted = 0;
        let output = bare_specifier_pattern().replace_all(content, |caps: &regex::Captures| {
            quoted += 1;
            format!("{}'{}'{}", &caps[1], &caps[2], &caps[3])
        });
        if quoted > 0 {
            fixes.push(format!("Quoted {} bare module specifier(s)", quoted));
        }

        let mut terminated = 0;
        let output = unterminated_import_pattern().replace_all(&output, |caps: &regex::Captures| {
            terminated += 1;
            format!("{};", &caps[1])
        });
        if terminated > 0 {
            fixes.push(format!("Added ';' to {} import statement(s)", terminated));
        }

        let output = match strip_client_directive(&output) {
            Some(stripped) => {
                fixes.push("Removed 'use client' directive".to_string());
                stripped
            }
            None => output.into_owned(),
        };

        PassOutcome {
            content: output,
            fixes,
            warnings: Vec::new(),
        }
    }
}
