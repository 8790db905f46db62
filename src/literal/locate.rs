//! Locating `name = { ... }` assignments in source text.

use regex::Regex;

/// Byte span of one object-literal assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Index of the opening `{`.
    pub open: usize,
    /// Index one past the matching `}`.
    pub close: usize,
    /// Leading whitespace of the line holding the assignment.
    pub indent: String,
}

impl Assignment {
    /// The `{ ... }` literal, braces included.
    pub fn literal<'a>(&self, text: &'a str) -> &'a str {
        &text[self.open..self.close]
    }

    /// Replace the literal, leaving every other byte of `text` untouched.
    pub fn splice(&self, text: &str, literal: &str) -> String {
        let mut out = String::with_capacity(text.len() + literal.len());
        out.push_str(&text[..self.open]);
        out.push_str(literal);
        out.push_str(&text[self.close..]);
        out
    }
}

/// Find the first `name = {` assignment, optionally written as `this.name`,
/// `const name`, `let name` or `var name`, and its matching closing brace.
/// Returns `None` when the assignment is absent or never closed.
pub fn find_assignment(text: &str, name: &str) -> Option<Assignment> {
    let pattern = format!(
        r"(?m)^([ \t]*)(?:this\.|const\s+|let\s+|var\s+)?{}\s*=\s*\{{",
        regex::escape(name)
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(text)?;
    let whole = caps.get(0)?;
    let indent = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
    let open = whole.end() - 1;
    let close = matching_brace(text, open)?;
    Some(Assignment { open, close: close + 1, indent })
}

/// Index of the `}` closing the `{` at `open`, skipping strings and comments.
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    None
}
