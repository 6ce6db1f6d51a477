use crate::markup::{find_tag_end, tag_openings, VOID_ELEMENTS};
use crate::repair::{is_markup_path, PassOutcome, RepairPass};
use regex::Regex;
use std::sync::OnceLock;

fn void_closer_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names = VOID_ELEMENTS.join("|");
        Regex::new(&format!(r"</(?:{})\s*>", names)).expect("Invalid void closer regex")
    })
}

enum TagEdit {
    SelfClose,
    Spacing,
}

/// Rewrites a void opening tag to end in ` />`, or `None` when it already does
fn normalize_tag(tag: &str) -> Option<(String, TagEdit)> {
    let inner = tag[..tag.len() - 1].trim_end();

    match inner.strip_suffix('/') {
        Some(body) => {
            let attrs = body.trim_end();
            let gap = &body[attrs.len()..];
            if gap == " " || gap.contains('\n') {
                None
            } else {
                Some((format!("{} />", attrs), TagEdit::Spacing))
            }
        }
        None => Some((format!("{} />", inner), TagEdit::SelfClose)),
    }
}

/// Self-closes void elements and drops their stray closing tags
pub struct VoidElementPass;

impl RepairPass for VoidElementPass {
    fn name(&self) -> &'static str {
        "void-elements"
    }

    fn applies_to(&self, path: &str) -> bool {
        is_markup_path(path)
    }

    fn apply(&self, _path: &str, content: &str) -> PassOutcome {
        let mut edits: Vec<(usize, usize, String)> = Vec::new();
        let mut self_closed = 0;
        let mut respaced = 0;

        for name in VOID_ELEMENTS {
            for start in tag_openings(content, name) {
                let Some(end) = find_tag_end(content, start) else {
                    continue;
                };
                if let Some((replacement, edit)) = normalize_tag(&content[start..=end]) {
                    match edit {
                        TagEdit::SelfClose => self_closed += 1,
                        TagEdit::Spacing => respaced += 1,
                    }
                    edits.push((start, end + 1, replacement));
                }
            }
        }
        edits.sort_by_key(|(start, _, _)| *start);

        let mut output = String::with_capacity(content.len() + edits.len() * 2);
        let mut last = 0;
        for (start, end, replacement) in edits {
            // a void tag quoted inside another tag's attribute
            if start < last {
                continue;
            }
            output.push_str(&content[last..start]);
            output.push_str(&replacement);
            last = end;
        }
        output.push_str(&content[last..]);

        let mut closers = 0;
        let output = void_closer_pattern()
            .replace_all(&output, |_: &regex::Captures| {
                closers += 1;
                ""
            })
            .into_owned();

        let mut outcome = PassOutcome::unchanged(&output);
        if self_closed > 0 {
            outcome = outcome.with_fix(format!("Self-closed {} void element(s)", self_closed));
        }
        if closers > 0 {
            outcome = outcome.with_fix(format!("Removed {} closing tag(s) of void elements", closers));
        }
        if respaced > 0 {
            outcome = outcome.with_fix(format!("Normalized spacing before '/>' in {} tag(s)", respaced));
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        image = { r#"<img src="x">"#, r#"<img src="x" />"# },
        trailing_space = { r#"<img src="x" >"#, r#"<img src="x" />"# },
        no_space = { r#"<img src="x"/>"#, r#"<img src="x" />"# },
        bare_br = { "<br>", "<br />" },
        tight_br = { "<br/>", "<br />" },
        arrow_handler = {
            "<input value={v} onChange={(e) => set(e.target.value)}>",
            "<input value={v} onChange={(e) => set(e.target.value)} />"
        },
        stray_closer = { r#"<input type="text"></input>"#, r#"<input type="text" />"# },
        meta = { r#"<meta charSet="utf-8">"#, r#"<meta charSet="utf-8" />"# },
        wrapped_class_list = {
            "<input\n  className=\"w-full px-4 py-2\n    border rounded\"\n>",
            "<input\n  className=\"w-full px-4 py-2\n    border rounded\" />"
        },
    )]
    fn test_void_normalization(input: &str, expected: &str) {
        let out = VoidElementPass.apply("src/A.tsx", input);
        assert_eq!(out.content, expected);
        assert!(VoidElementPass.apply("src/A.tsx", &out.content).fixes.is_empty());
    }

    #[parameterized(
        already_closed = { r#"<img src="x" />"# },
        multiline_close = { "<img\n  src=\"x\"\n/>" },
        component = { "<Input value={v}>" },
        longer_name = { "<image href=\"x\"></image>" },
        truncated = { "<img src=\"x\n<p>hi</p>" },
    )]
    fn test_void_left_alone(input: &str) {
        let out = VoidElementPass.apply("src/A.tsx", input);
        assert_eq!(out.content, input);
        assert!(out.fixes.is_empty());
    }
}
