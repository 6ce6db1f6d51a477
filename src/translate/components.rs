//! Content rewrites: framework helper imports, their JSX components, and the entry HTML

use crate::markup::{find_tag_end, has_attribute, is_self_closing, tag_openings};
use regex::Regex;
use std::sync::OnceLock;

/// Module script path the target build expects in `index.html`
pub const ENTRY_SCRIPT: &str = "/src/main.tsx";

fn directive_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*['"]use client['"];?[ \t]*\r?\n?"#)
            .expect("Invalid directive regex")
    })
}

fn helper_import_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*import\s+[^;\n]*?\s+from\s+['"]next/(head|link|image)['"];?[ \t]*\r?\n?"#)
            .expect("Invalid helper import regex")
    })
}

fn router_import_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"from\s+['"]react-router(?:-dom)?['"]"#).expect("Invalid router regex")
    })
}

/// Removes `'use client'` directive statements
pub fn strip_client_directive(content: &str) -> Option<String> {
    let stripped = directive_pattern().replace_all(content, "");
    match stripped {
        std::borrow::Cow::Borrowed(_) => None,
        std::borrow::Cow::Owned(s) => Some(s),
    }
}

/// Whether `name` is bound by any remaining import statement
fn is_imported(content: &str, name: &str) -> bool {
    let pattern = format!(r"import\s+[^;]*\b{}\b[^;]*?\s+from\s", regex::escape(name));
    Regex::new(&pattern)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

fn uses_component(content: &str, name: &str) -> bool {
    !tag_openings(content, name).is_empty()
}

/// Rewrites framework helper components to plain elements.
///
/// A component is rewritten when its framework import was present, or when
/// it is used without being imported from anywhere.
pub fn rewrite_framework_components(content: &str, changes: &mut Vec<String>) -> String {
    let mut removed: Vec<String> = Vec::new();
    let mut output = helper_import_pattern()
        .replace_all(content, |caps: &regex::Captures| {
            removed.push(caps[1].to_string());
            String::new()
        })
        .into_owned();

    for module in &removed {
        changes.push(format!("Removed next/{} import", module));
    }

    let applies = |output: &str, module: &str, component: &str| {
        uses_component(output, component)
            && (removed.iter().any(|m| m == module) || !is_imported(output, component))
    };

    if applies(&output, "head", "Head") {
        output = output.replace("<Head>", "<>").replace("</Head>", "</>");
        changes.push("Replaced <Head> with a fragment".to_string());
    }

    if applies(&output, "link", "Link") {
        if router_import_pattern().is_match(&output) {
            let (rewritten, count) = rename_link_href(&output);
            if count > 0 {
                output = rewritten;
                changes.push(format!("Converted {} <Link href> to router <Link to>", count));
            }
        } else {
            let (rewritten, count) = links_to_anchors(&output);
            if count > 0 {
                output = rewritten;
                changes.push(format!("Replaced {} <Link> with <a>", count));
            }
        }
    }

    if applies(&output, "image", "Image") {
        let count = tag_openings(&output, "Image").len();
        output = replace_tag_name(&output, "Image", "img").replace("</Image>", "");
        changes.push(format!("Replaced {} <Image> with <img>", count));
    }

    output
}

/// Replaces `<from` openings with `<to`, keeping attributes
fn replace_tag_name(content: &str, from: &str, to: &str) -> String {
    let mut output = String::with_capacity(content.len());
    let mut last = 0;
    for idx in tag_openings(content, from) {
        output.push_str(&content[last..idx]);
        output.push('<');
        output.push_str(to);
        last = idx + 1 + from.len();
    }
    output.push_str(&content[last..]);
    output
}

/// `<Link href=...>` → `<a href=...>`, leaving self-closing `<Link />` without
/// a destination alone (those are icon components that share the name).
fn links_to_anchors(content: &str) -> (String, usize) {
    let mut output = String::with_capacity(content.len());
    let mut last = 0;
    let mut count = 0;

    for idx in tag_openings(content, "Link") {
        let Some(end) = find_tag_end(content, idx) else {
            continue;
        };
        let tag = &content[idx..=end];
        if is_self_closing(tag) && !has_attribute(tag, "href") {
            continue;
        }
        output.push_str(&content[last..idx]);
        output.push_str("<a");
        last = idx + "<Link".len();
        count += 1;
    }
    output.push_str(&content[last..]);

    if count > 0 {
        output = output.replace("</Link>", "</a>");
    }
    (output, count)
}

/// With a client-side router the `Link` component stays; its `href` becomes `to`
fn rename_link_href(content: &str) -> (String, usize) {
    let mut output = String::with_capacity(content.len());
    let mut last = 0;
    let mut count = 0;

    for idx in tag_openings(content, "Link") {
        let Some(end) = find_tag_end(content, idx) else {
            continue;
        };
        let tag = &content[idx..=end];
        let Some(rel) = tag.find(" href=") else {
            continue;
        };
        output.push_str(&content[last..idx + rel]);
        output.push_str(" to=");
        last = idx + rel + " href=".len();
        count += 1;
    }
    output.push_str(&content[last..]);
    (output, count)
}

fn cdn_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r#"(?i)[ \t]*<script[^>]*\bsrc=["']https?://[^"']*(?:tailwind|bootstrap)[^"']*["'][^>]*>\s*</script>[ \t]*\r?\n?"#,
            r#"(?i)[ \t]*<link[^>]*\bhref=["']https?://[^"']*(?:tailwind|bootstrap)[^"']*["'][^>]*>[ \t]*\r?\n?"#,
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid CDN regex"))
        .collect()
    })
}

fn module_script_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<script\b[^>]*\btype=["']module["'][^>]*>"#).expect("Invalid script regex")
    })
}

fn script_src_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\bsrc=["']([^"']*)["']"#).expect("Invalid src regex"))
}

/// Rewrites the entry HTML: module script points at the Vite entry, CDN style frameworks removed
pub fn rewrite_entry_html(content: &str, entry_script: &str, changes: &mut Vec<String>) -> String {
    let mut output = content.to_string();

    for re in cdn_patterns() {
        let stripped = re.replace_all(&output, "").into_owned();
        if stripped != output {
            changes.push("Removed CDN style framework include".to_string());
            output = stripped;
        }
    }

    match module_script_pattern().find(&output) {
        Some(tag) => {
            let tag_text = tag.as_str().to_string();
            if let Some(caps) = script_src_pattern().captures(&tag_text) {
                let src = &caps[1];
                let already_entry = src == entry_script
                    || src
                        .trim_start_matches('.')
                        .strip_prefix("/src/main.")
                        .map(|ext| matches!(ext, "tsx" | "ts" | "jsx" | "js"))
                        .unwrap_or(false);
                if !already_entry {
                    let new_tag = tag_text.replacen(src, entry_script, 1);
                    output = output.replacen(&tag_text, &new_tag, 1);
                    changes.push(format!("Pointed module script at {}", entry_script));
                }
            }
        }
        None => {
            if let Some(idx) = output.rfind("</body>") {
                let script = format!("    <script type=\"module\" src=\"{}\"></script>\n  ", entry_script);
                output.insert_str(idx, &script);
                changes.push("Added module entry script".to_string());
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_directive() {
        let content = "'use client';\nimport React from 'react';\n";
        assert_eq!(
            strip_client_directive(content).as_deref(),
            Some("import React from 'react';\n")
        );
        assert!(strip_client_directive("import React from 'react';\n").is_none());
    }

    #[test]
    fn test_link_to_anchor() {
        let content = "import Link from 'next/link';\n\nexport default function Nav() {\n  return <Link href=\"/about\" className=\"nav\">About</Link>;\n}\n";
        let mut changes = Vec::new();
        let out = rewrite_framework_components(content, &mut changes);

        assert!(!out.contains("next/link"));
        assert!(out.contains("<a href=\"/about\" className=\"nav\">About</a>"));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_self_closing_link_without_href_is_icon() {
        let content = "import Link from 'next/link';\nconst a = <Link href=\"/\">Home</Link>;\nconst b = <Link className=\"h-4 w-4\" />;\n";
        let mut changes = Vec::new();
        let out = rewrite_framework_components(content, &mut changes);

        assert!(out.contains("<a href=\"/\">Home</a>"));
        assert!(out.contains("<Link className=\"h-4 w-4\" />"));
    }

    #[test]
    fn test_router_link_preserved() {
        let content = "import Link from 'next/link';\nimport { BrowserRouter } from 'react-router-dom';\nconst a = <Link href=\"/pricing\">Pricing</Link>;\n";
        let mut changes = Vec::new();
        let out = rewrite_framework_components(content, &mut changes);

        assert!(out.contains("<Link to=\"/pricing\">Pricing</Link>"));
        assert!(!out.contains("next/link"));
    }

    #[test]
    fn test_lucide_link_icon_untouched() {
        let content = "import { Link } from 'lucide-react';\nconst icon = <Link size={16} href=\"x\">a</Link>;\n";
        let mut changes = Vec::new();
        let out = rewrite_framework_components(content, &mut changes);
        assert_eq!(out, content);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_head_and_image() {
        let content = "import Head from 'next/head';\nimport Image from 'next/image';\nconst p = (<div><Head><title>x</title></Head><Image src=\"/a.png\" alt=\"a\" width={10} /></div>);\n";
        let mut changes = Vec::new();
        let out = rewrite_framework_components(content, &mut changes);

        assert!(out.contains("<><title>x</title></>"));
        assert!(out.contains("<img src=\"/a.png\" alt=\"a\" width={10} />"));
        assert!(!out.contains("next/"));
    }

    #[test]
    fn test_entry_html_rewrite() {
        let html = "<html>\n<head>\n  <script src=\"https://cdn.tailwindcss.com\"></script>\n</head>\n<body>\n  <div id=\"root\"></div>\n  <script type=\"module\" src=\"/index.jsx\"></script>\n</body>\n</html>\n";
        let mut changes = Vec::new();
        let out = rewrite_entry_html(html, ENTRY_SCRIPT, &mut changes);

        assert!(!out.contains("cdn.tailwindcss.com"));
        assert!(out.contains("<script type=\"module\" src=\"/src/main.tsx\"></script>"));
        assert_eq!(changes.len(), 2);

        let mut again = Vec::new();
        assert_eq!(rewrite_entry_html(&out, ENTRY_SCRIPT, &mut again), out);
        assert!(again.is_empty());
    }

    #[test]
    fn test_entry_html_adds_script() {
        let html = "<html><body><div id=\"root\"></div></body></html>";
        let mut changes = Vec::new();
        let out = rewrite_entry_html(html, ENTRY_SCRIPT, &mut changes);
        assert!(out.contains("src=\"/src/main.tsx\""));
    }

    #[test]
    fn test_entry_html_keeps_jsx_entry() {
        let html = "<body><script type=\"module\" src=\"/src/main.jsx\"></script></body>";
        let mut changes = Vec::new();
        assert_eq!(rewrite_entry_html(html, ENTRY_SCRIPT, &mut changes), html);
    }
}
