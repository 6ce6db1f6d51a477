//! Tolerant token scanner for bracket and quote balance
//!
//! Brackets are only counted in code, never inside string literals, template
//! text or comments. Quotes are tracked with explicit backslash-escape
//! handling, and a `'` between two word characters (`Don't`) is treated as an
//! apostrophe rather than a string delimiter.

/// Net counts left over after scanning a whole file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balance {
    pub braces: i32,
    pub parens: i32,
    pub brackets: i32,
    /// First closing bracket seen with nothing open
    pub stray_closer: Option<char>,
    /// Quote character of a string literal still open at end of file
    pub open_quote: Option<char>,
    pub open_comment: bool,
}

impl Balance {
    pub fn is_balanced(&self) -> bool {
        self.braces == 0
            && self.parens == 0
            && self.brackets == 0
            && self.stray_closer.is_none()
            && self.open_quote.is_none()
            && !self.open_comment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    LineComment,
    BlockComment,
    Str(u8),
    Template,
}

fn is_word(b: Option<&u8>) -> bool {
    matches!(b, Some(c) if c.is_ascii_alphanumeric())
}

pub fn scan(content: &str) -> Balance {
    let bytes = content.as_bytes();
    let mut balance = Balance::default();
    let mut mode = Mode::Code;
    // brace depth at which each open `${` interpolation returns to template text
    let mut interpolations: Vec<i32> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        match mode {
            Mode::LineComment => {
                if b == b'\n' {
                    mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    mode = Mode::Code;
                    i += 1;
                }
            }
            Mode::Str(quote) => {
                if b == b'\\' {
                    i += 1;
                } else if b == quote {
                    mode = Mode::Code;
                }
            }
            Mode::Template => {
                if b == b'\\' {
                    i += 1;
                } else if b == b'`' {
                    mode = Mode::Code;
                } else if b == b'$' && next == Some(b'{') {
                    interpolations.push(balance.braces);
                    balance.braces += 1;
                    mode = Mode::Code;
                    i += 1;
                }
            }
            Mode::Code => match b {
                b'/' if next == Some(b'/') => {
                    mode = Mode::LineComment;
                    i += 1;
                }
                b'/' if next == Some(b'*') => {
                    mode = Mode::BlockComment;
                    i += 1;
                }
                b'"' => mode = Mode::Str(b'"'),
                b'\'' => {
                    let apostrophe = i > 0 && is_word(bytes.get(i - 1)) && is_word(bytes.get(i + 1));
                    if !apostrophe {
                        mode = Mode::Str(b'\'');
                    }
                }
                b'`' => mode = Mode::Template,
                b'{' => balance.braces += 1,
                b'}' => {
                    balance.braces -= 1;
                    if interpolations.last() == Some(&balance.braces) {
                        interpolations.pop();
                        mode = Mode::Template;
                    } else if balance.braces < 0 && balance.stray_closer.is_none() {
                        balance.stray_closer = Some('}');
                    }
                }
                b'(' => balance.parens += 1,
                b')' => {
                    balance.parens -= 1;
                    if balance.parens < 0 && balance.stray_closer.is_none() {
                        balance.stray_closer = Some(')');
                    }
                }
                b'[' => balance.brackets += 1,
                b']' => {
                    balance.brackets -= 1;
                    if balance.brackets < 0 && balance.stray_closer.is_none() {
                        balance.stray_closer = Some(']');
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    match mode {
        Mode::Str(quote) => balance.open_quote = Some(quote as char),
        Mode::Template => balance.open_quote = Some('`'),
        Mode::BlockComment => balance.open_comment = true,
        Mode::Code | Mode::LineComment => {}
    }
    balance
}
