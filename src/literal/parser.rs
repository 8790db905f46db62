//! Tolerant reader for object literals.

use super::{JsValue, Members};
use crate::error::{CurateError, Result};

/// Parse `text`, which must hold exactly one `{ ... }` literal (surrounding
/// whitespace and comments allowed). `base_offset` is added to error offsets
/// so they point into the enclosing file.
pub fn parse_object(text: &str, base_offset: usize, context: &str) -> Result<Members> {
    let mut parser = Parser { src: text, pos: 0, base: base_offset, context };
    parser.skip_trivia()?;
    let members = parser.object()?;
    parser.skip_trivia()?;
    if parser.pos < text.len() {
        return Err(parser.error("unexpected text after object"));
    }
    Ok(members)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    base: usize,
    context: &'a str,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> CurateError {
        CurateError::Parse {
            context: self.context.to_string(),
            offset: self.base + self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn expect(&mut self, wanted: char) -> Result<()> {
        match self.peek() {
            Some(ch) if ch == wanted => {
                self.pos += ch.len_utf8();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{wanted}', found '{ch}'"))),
            None => Err(self.error(format!("expected '{wanted}', found end of input"))),
        }
    }

    /// Whitespace plus `//` and `/* */` comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(ch), _) if ch.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(ch) = self.bump() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.src[self.pos..].find("*/") {
                        Some(rel) => self.pos += rel + 2,
                        None => {
                            self.pos = start;
                            return Err(self.error("unterminated block comment"));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn object(&mut self) -> Result<Members> {
        self.expect('{')?;
        let mut members = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.bump();
                return Ok(members);
            }
            let key = self.key()?;
            self.skip_trivia()?;
            self.expect(':')?;
            self.skip_trivia()?;
            let value = self.value()?;
            members.push((key, value));
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                Some(ch) => return Err(self.error(format!("expected ',' or '}}', found '{ch}'"))),
                None => return Err(self.error("unterminated object")),
            }
        }
    }

    fn array(&mut self) -> Result<Vec<JsValue>> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.bump();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(ch) => return Err(self.error(format!("expected ',' or ']', found '{ch}'"))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn key(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'' | '`')) => self.string(quote),
            Some(ch) if is_ident_char(ch) => Ok(self.identifier()),
            Some(ch) => Err(self.error(format!("unexpected '{ch}' where a key was expected"))),
            None => Err(self.error("unterminated object")),
        }
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if is_ident_char(ch)) {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    fn value(&mut self) -> Result<JsValue> {
        match self.peek() {
            Some('{') => Ok(JsValue::Object(self.object()?)),
            Some('[') => Ok(JsValue::Array(self.array()?)),
            Some(quote @ ('"' | '\'' | '`')) => Ok(JsValue::String(self.string(quote)?)),
            Some(ch) if ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.') => self.number(),
            Some(ch) if is_ident_char(ch) => {
                let start = self.pos;
                let word = self.identifier();
                match word.as_str() {
                    "true" => Ok(JsValue::Bool(true)),
                    "false" => Ok(JsValue::Bool(false)),
                    "null" | "undefined" => Ok(JsValue::Null),
                    "Infinity" | "NaN" => Ok(JsValue::Number(word)),
                    _ => {
                        self.pos = start;
                        Err(self.error(format!("unsupported expression '{word}'")))
                    }
                }
            }
            Some(ch) => Err(self.error(format!("unexpected '{ch}' where a value was expected"))),
            None => Err(self.error("missing value")),
        }
    }

    fn number(&mut self) -> Result<JsValue> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let mut prev = ' ';
        while let Some(ch) = self.peek() {
            let exponent_sign = matches!(ch, '+' | '-') && matches!(prev, 'e' | 'E');
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' || exponent_sign {
                prev = ch;
                self.bump();
            } else {
                break;
            }
        }
        let raw = &self.src[start..self.pos];
        if !raw.chars().any(|c| c.is_ascii_digit()) && !raw.ends_with("Infinity") {
            self.pos = start;
            return Err(self.error(format!("invalid number '{raw}'")));
        }
        Ok(JsValue::Number(raw.to_string()))
    }

    fn string(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            let Some(ch) = self.bump() else {
                self.pos = start;
                return Err(self.error("unterminated string"));
            };
            if ch == quote {
                return Ok(out);
            }
            if ch == '\\' {
                self.escape(&mut out)?;
            } else {
                out.push(ch);
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<()> {
        let Some(ch) = self.bump() else {
            return Err(self.error("unterminated escape"));
        };
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // line continuation
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            'x' => {
                let code = self.hex_digits(2)?;
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            'u' => {
                let code = if self.peek() == Some('{') {
                    self.bump();
                    let start = self.pos;
                    while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                        self.bump();
                    }
                    let digits = &self.src[start..self.pos];
                    let code = u32::from_str_radix(digits, 16)
                        .map_err(|_| self.error("invalid unicode escape"))?;
                    self.expect('}')?;
                    code
                } else {
                    self.hex_digits(4)?
                };
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32> {
        let start = self.pos;
        for _ in 0..count {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.bump();
                }
                _ => return Err(self.error("invalid hex escape")),
            }
        }
        u32::from_str_radix(&self.src[start..self.pos], 16)
            .map_err(|_| self.error("invalid hex escape"))
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::member;

    #[test]
    fn reads_bare_and_quoted_keys_with_mixed_quotes() {
        let members = parse_object(
            r#"{ major: { description: 'Ionian mode', "validationStatus": "verified" } }"#,
            0,
            "test",
        )
        .expect("parse");
        assert_eq!(members.len(), 1);
        let major = members[0].1.as_object().expect("object");
        assert_eq!(member(major, "description").and_then(JsValue::as_str), Some("Ionian mode"));
        assert_eq!(member(major, "validationStatus").and_then(JsValue::as_str), Some("verified"));
    }

    #[test]
    fn tolerates_comments_and_trailing_commas() {
        let text = "{\n  // modes\n  dorian: [0, 2, 3, 5, 7, 9, 10,],\n  /* block */ ionian: [0, 2, 4],\n}";
        let members = parse_object(text, 0, "scales").expect("parse");
        let names: Vec<&str> = members.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["dorian", "ionian"]);
        assert_eq!(members[0].1.as_array().map(<[JsValue]>::len), Some(7));
    }

    #[test]
    fn keeps_braces_inside_strings() {
        let members = parse_object(r#"{ a: { description: "uses {braces} and \"quotes\"" } }"#, 0, "t")
            .expect("parse");
        let a = members[0].1.as_object().expect("object");
        assert_eq!(
            member(a, "description").and_then(JsValue::as_str),
            Some(r#"uses {braces} and "quotes""#)
        );
    }

    #[test]
    fn decodes_escapes_and_keeps_unicode() {
        let members =
            parse_object(r"{ 'forró': 'café\ttab\x41', yaraví: `line` }", 0, "t").expect("parse");
        assert_eq!(members[0].0, "forró");
        assert_eq!(members[0].1.as_str(), Some("café\ttabA"));
        assert_eq!(members[1].0, "yaraví");
    }

    #[test]
    fn numbers_keep_source_spelling() {
        let members = parse_object("{ a: 21, b: -0.5, c: 1e-3, d: true, e: null }", 0, "t")
            .expect("parse");
        assert_eq!(members[0].1, JsValue::Number("21".into()));
        assert_eq!(members[1].1.as_f64(), Some(-0.5));
        assert_eq!(members[2].1, JsValue::Number("1e-3".into()));
        assert_eq!(members[3].1, JsValue::Bool(true));
        assert_eq!(members[4].1, JsValue::Null);
    }

    #[test]
    fn reports_offset_of_unsupported_expression() {
        let err = parse_object("{ a: someVariable }", 100, "scaleCitations").unwrap_err();
        match err {
            CurateError::Parse { offset, context, .. } => {
                assert_eq!(offset, 105);
                assert_eq!(context, "scaleCitations");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_unterminated_input() {
        assert!(parse_object("{ a: 'open", 0, "t").is_err());
        assert!(parse_object("{ a: [1, 2 }", 0, "t").is_err());
        assert!(parse_object("{ a: 1 } trailing", 0, "t").is_err());
    }
}
