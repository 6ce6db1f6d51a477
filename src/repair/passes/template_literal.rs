use crate::repair::{is_markup_path, PassOutcome, RepairPass};
use regex::Regex;
use std::sync::OnceLock;

/// Lines an interpolation may span before the match is considered unrelated code
const MAX_SPAN_LINES: usize = 6;

fn broken_template_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\b(class(?:Name)?)="([^"`\n]*\$\{[^`]*?)`\}"#)
            .expect("Invalid broken template regex")
    })
}

fn line_break_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]*\r?\n\s*").expect("Invalid line break regex"))
}

/// `className="a ${b\n ? 'c' : 'd'}`}` → ``className={`a ${b ? 'c' : 'd'}`}``
pub struct TemplateLiteralPass;

impl RepairPass for TemplateLiteralPass {
    fn name(&self) -> &'static str {
        "template-literal"
    }

    fn applies_to(&self, path: &str) -> bool {
        is_markup_path(path)
    }

    fn apply(&self, _path: &str, content: &str) -> PassOutcome {
        let mut count = 0;
        let output = broken_template_pattern().replace_all(content, |caps: &regex::Captures| {
            let value = &caps[2];
            let spans_lines = value.contains('\n');
            let unrelated = value.matches('\n').count() > MAX_SPAN_LINES
                || value.contains("className=")
                || value.contains("class=");
            if !spans_lines || unrelated || !value.trim_end().ends_with('}') {
                return caps[0].to_string();
            }

            count += 1;
            let joined = line_break_pattern().replace_all(value, " ");
            format!("{}={{`{}`}}", &caps[1], joined)
        });

        if count == 0 {
            return PassOutcome::unchanged(content);
        }
        PassOutcome::unchanged(&output)
            .with_fix(format!("Rebuilt {} multi-line template literal attribute(s)", count))
    }
}
