use crate::repair::{is_markup_path, PassOutcome, RepairPass};
use regex::Regex;
use std::sync::OnceLock;

/// `className="px-4 py-2" bg-blue-500 hover:bg-blue-600`}` on one line
fn leaked_tokens_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\b(class(?:Name)?)="([^"\n]*)"((?:[ \t]+[\w:/%.\[\]\-]+)+)[ \t]*`\}"#)
            .expect("Invalid leaked tokens regex")
    })
}

/// Plain attribute values with stray backticks inside the quotes
fn quoted_backtick_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([ \t][A-Za-z][\w\-:]*)="([^"\n]*`[^"\n]*)""#)
            .expect("Invalid quoted backtick regex")
    })
}

pub struct AttributeLeakPass;

impl RepairPass for AttributeLeakPass {
    fn name(&self) -> &'static str {
        "attribute-leak"
    }

    fn applies_to(&self, path: &str) -> bool {
        is_markup_path(path)
    }

    fn apply(&self, _path: &str, content: &str) -> PassOutcome {
        let mut merged = 0;
        let output = leaked_tokens_pattern().replace_all(content, |caps: &regex::Captures| {
            merged += 1;
            let leaked = caps[3].split_whitespace().collect::<Vec<_>>().join(" ");
            let value = format!("{} {}", caps[2].trim_end(), leaked);
            let value = value.trim_start();
            if value.contains("${") {
                format!("{}={{`{}`}}", &caps[1], value)
            } else {
                format!("{}=\"{}\"", &caps[1], value)
            }
        });

        let mut stripped = 0;
        let output = quoted_backtick_pattern().replace_all(&output, |caps: &regex::Captures| {
            let value = &caps[2];
            if value.contains("${") {
                return caps[0].to_string();
            }
            stripped += 1;
            format!("{}=\"{}\"", &caps[1], value.replace('`', ""))
        });

        let mut outcome = PassOutcome::unchanged(&output);
        if merged > 0 {
            outcome = outcome.with_fix(format!("Merged leaked class tokens into {} attribute(s)", merged));
        }
        if stripped > 0 {
            outcome = outcome.with_fix(format!("Removed stray backticks from {} attribute value(s)", stripped));
        }
        outcome
    }
}
