//! Small JSX/HTML tag scanning helpers shared by the textual stages
//!
//! These are not a parser: they only find where an opening tag ends while
//! skipping over quoted attribute values and `{...}` expressions, so that
//! `onChange={(e) => set(e)}` does not end the tag at the arrow's `>`.

/// HTML void elements; in JSX these must always be self-closed
pub const VOID_ELEMENTS: &[&str] = &[
    "img", "input", "br", "hr", "link", "meta", "source", "track", "area", "base", "col", "embed",
    "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Byte offsets of every `<name` tag opening (not closing tags, not longer names)
pub fn tag_openings(content: &str, name: &str) -> Vec<usize> {
    let needle = format!("<{}", name);
    let bytes = content.as_bytes();
    content
        .match_indices(&needle)
        .map(|(idx, _)| idx)
        .filter(|&idx| {
            let after = idx + needle.len();
            match bytes.get(after) {
                None => true,
                Some(b) => b.is_ascii_whitespace() || *b == b'/' || *b == b'>',
            }
        })
        .collect()
}

/// Given the offset of a `<`, returns the offset of the `>` that closes the opening tag.
///
/// Attribute strings may wrap across lines (long class lists do). Returns `None`
/// when the tag never closes, a wrapped attribute string reaches a `<` before
/// its closing quote, or a new `<` starts at the top level first. All of these
/// usually mean the tag was truncated.
pub fn find_tag_end(content: &str, start: usize) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut attr_quote: Option<u8> = None;
    let mut attr_wrapped = false;
    let mut code_quote: Option<u8> = None;
    let mut i = start + 1;

    while i < bytes.len() {
        let b = bytes[i];

        if let Some(q) = code_quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                code_quote = None;
            }
            i += 1;
            continue;
        }

        if let Some(q) = attr_quote {
            match b {
                b'\n' => attr_wrapped = true,
                b'<' if attr_wrapped => return None,
                _ if b == q => {
                    attr_quote = None;
                    attr_wrapped = false;
                }
                _ => {}
            }
            i += 1;
            continue;
        }

        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'"' | b'\'' if depth == 0 => attr_quote = Some(b),
            b'"' | b'\'' | b'`' if depth > 0 => code_quote = Some(b),
            b'<' if depth == 0 => return None,
            b'>' if depth == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Whether an opening tag's text (from `<` through `>`) ends in `/>`
pub fn is_self_closing(tag: &str) -> bool {
    tag.trim_end_matches('>').trim_end().ends_with('/')
}

/// Whether the opening tag text carries the named attribute
pub fn has_attribute(tag: &str, attribute: &str) -> bool {
    let bytes = tag.as_bytes();
    tag.match_indices(attribute).any(|(idx, _)| {
        let before_ok = idx > 0 && bytes[idx - 1].is_ascii_whitespace();
        let after = idx + attribute.len();
        let after_ok = matches!(bytes.get(after), Some(b'=') | Some(b' ') | Some(b'/') | Some(b'>'));
        before_ok && after_ok
    })
}

/// Byte offsets, within an opening tag's text, of `attribute=` written at the
/// top level of the tag (not inside a quoted value or a `{...}` expression)
pub fn attribute_offsets(tag: &str, attribute: &str) -> Vec<usize> {
    let bytes = tag.as_bytes();
    let needle = attribute.as_bytes();
    let mut offsets = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 1;

    while i < bytes.len() {
        let b = bytes[i];

        if let Some(q) = quote {
            if b == b'\\' && depth > 0 {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'"' | b'\'' => quote = Some(b),
            b'`' if depth > 0 => quote = Some(b),
            _ if depth == 0
                && bytes[i - 1].is_ascii_whitespace()
                && bytes[i..].starts_with(needle)
                && bytes.get(i + needle.len()) == Some(&b'=') =>
            {
                offsets.push(i);
            }
            _ => {}
        }
        i += 1;
    }
    offsets
}
