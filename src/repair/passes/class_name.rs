use crate::markup::{attribute_offsets, find_tag_end};
use crate::repair::{is_markup_path, PassOutcome, RepairPass};
use regex::Regex;
use std::sync::OnceLock;

fn tag_start_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[A-Za-z][\w.\-]*(?:[\s/>]|$)").expect("Invalid tag start regex"))
}

/// Offsets of every `class=` that opens an attribute value in a tag
fn class_attributes(content: &str) -> Vec<usize> {
    let bytes = content.as_bytes();
    let mut offsets: Vec<usize> = tag_start_pattern()
        .find_iter(content)
        .filter_map(|m| {
            let end = find_tag_end(content, m.start())?;
            Some((m.start(), end))
        })
        .flat_map(|(start, end)| {
            attribute_offsets(&content[start..=end], "class")
                .into_iter()
                .map(move |offset| start + offset)
        })
        .filter(|&offset| matches!(bytes.get(offset + "class=".len()), Some(b'"' | b'\'' | b'{')))
        .collect();
    offsets.sort_unstable();
    offsets.dedup();
    offsets
}

/// HTML `class` attributes become JSX `className`
pub struct ClassNamePass;

impl RepairPass for ClassNamePass {
    fn name(&self) -> &'static str {
        "class-name"
    }

    fn applies_to(&self, path: &str) -> bool {
        is_markup_path(path)
    }

    fn apply(&self, _path: &str, content: &str) -> PassOutcome {
        let offsets = class_attributes(content);
        if offsets.is_empty() {
            return PassOutcome::unchanged(content);
        }

        let mut output = String::with_capacity(content.len() + offsets.len() * 4);
        let mut last = 0;
        for offset in &offsets {
            let split = offset + "class".len();
            output.push_str(&content[last..split]);
            output.push_str("Name");
            last = split;
        }
        output.push_str(&content[last..]);

        PassOutcome::unchanged(&output)
            .with_fix(format!("Renamed {} class attribute(s) to className", offsets.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        double = { r#"<div class="flex">"#, r#"<div className="flex">"# },
        single = { "<span class='a'>", "<span className='a'>" },
        expression = { "<p class={styles.p}>", "<p className={styles.p}>" },
        after_attrs = { r#"<a href="/" class="link">"#, r#"<a href="/" className="link">"# },
        multiline = { "<div\n  class=\"x\"\n>", "<div\n  className=\"x\"\n>" },
        after_arrow_handler = {
            r#"<button onClick={() => go()} class="btn">Go</button>"#,
            r#"<button onClick={() => go()} className="btn">Go</button>"#
        },
        nested_element = {
            r#"<Tooltip content={<span class="tip">Hi</span>} class="wrap">"#,
            r#"<Tooltip content={<span className="tip">Hi</span>} className="wrap">"#
        },
    )]
    fn test_class_renamed(input: &str, expected: &str) {
        let out = ClassNamePass.apply("src/A.tsx", input);
        assert_eq!(out.content, expected);
        assert_eq!(out.fixes.len(), 1);
        assert!(ClassNamePass.apply("src/A.tsx", &out.content).fixes.is_empty());
    }

    #[test]
    fn test_code_untouched() {
        let content = "const el = document.createElement('div');\nel.class = 'x';\nconst props = { class: 'y' };\n<div title=\"a class='b'\" onClick={() => pick({ class: 'c' })}>\n";
        assert!(ClassNamePass.apply("src/a.js", content).fixes.is_empty());
    }
}
