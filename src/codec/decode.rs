//! Hjson-style document reader.
//!
//! Recursive descent over the source text with 1-based line/column tracking
//! for error reporting. Interstitial text (whitespace and comments) is
//! captured verbatim and attached to the following node when formatting
//! preservation is on.

use super::DecodeOptions;
use crate::error::{ConfigError, ConfigResult};
use crate::value::{Map, Value, ValueKind};

pub(super) struct Reader<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    opts: DecodeOptions,
}

impl<'a> Reader<'a> {
    pub(super) fn new(src: &'a str, opts: &DecodeOptions) -> Self {
        Reader {
            src,
            pos: 0,
            line: 1,
            col: 1,
            opts: *opts,
        }
    }

    /// Parse a whole document: an optionally-braced root map.
    pub(super) fn document(mut self) -> ConfigResult<Value> {
        let before = self.interstitial()?;
        let mut root = if self.peek() == Some('{') {
            let mut v = self.parse_map(true)?;
            let trailing = self.interstitial()?;
            if self.peek().is_some() {
                return Err(self.error_here("unexpected characters after root value"));
            }
            if self.opts.preserve_formatting && !trailing.is_empty() {
                v.fmt_mut().after = trailing.to_string();
            }
            v
        } else {
            self.parse_map(false)?
        };
        if self.opts.preserve_formatting && !before.is_empty() {
            root.fmt_mut().before = before.to_string();
        }
        Ok(root)
    }

    // --- character plumbing ------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.src[self.pos..].chars();
        it.next();
        it.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn error_here(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::Syntax {
            line: self.line,
            column: self.col,
            message: message.into(),
        }
    }

    /// Consume whitespace and comments, returning the consumed span.
    fn interstitial(&mut self) -> ConfigResult<&'a str> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => self.line_comment(),
                Some('/') if self.peek2() == Some('/') => self.line_comment(),
                Some('/') if self.peek2() == Some('*') => self.block_comment()?,
                _ => break,
            }
        }
        Ok(&self.src[start..self.pos])
    }

    /// Consume to end of line, leaving the newline for the next capture.
    fn line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn block_comment(&mut self) -> ConfigResult<()> {
        self.bump(); // '/'
        self.bump(); // '*'
        loop {
            match self.peek() {
                Some('*') if self.peek2() == Some('/') => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error_here("unterminated block comment")),
            }
        }
    }

    /// Consume spaces and tabs only (same-line whitespace).
    fn skip_inline_ws(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.bump();
        }
    }

    /// Capture an optional same-line trailing comment (or consume a member
    /// separator comma). Restores position if nothing relevant follows the
    /// skipped spaces.
    fn inline_trailing(&mut self) -> ConfigResult<&'a str> {
        let save = (self.pos, self.line, self.col);
        let start = self.pos;
        self.skip_inline_ws();
        match self.peek() {
            Some(',') => {
                self.bump();
                Ok("")
            }
            Some('#') => {
                self.line_comment();
                Ok(&self.src[start..self.pos])
            }
            Some('/') if self.peek2() == Some('/') => {
                self.line_comment();
                Ok(&self.src[start..self.pos])
            }
            Some('/') if self.peek2() == Some('*') => {
                self.block_comment()?;
                Ok(&self.src[start..self.pos])
            }
            _ => {
                (self.pos, self.line, self.col) = save;
                Ok("")
            }
        }
    }

    // --- grammar -----------------------------------------------------------

    /// Map body. `braced` distinguishes `{...}` from the brace-less root.
    fn parse_map(&mut self, braced: bool) -> ConfigResult<Value> {
        if braced {
            self.bump(); // '{'
        }
        let mut map = Map::new();
        let inner;
        loop {
            let before = self.interstitial()?;
            match self.peek() {
                Some('}') if braced => {
                    self.bump();
                    inner = before;
                    break;
                }
                Some('}') => return Err(self.error_here("unexpected '}'")),
                None if braced => {
                    return Err(self.error_here("unexpected end of input, expected '}'"));
                }
                None => {
                    inner = before;
                    break;
                }
                Some(',') | Some(':') | Some('[') | Some(']') | Some('{') => {
                    return Err(self.error_here(format!(
                        "unexpected '{}', expected a key",
                        self.peek().unwrap_or_default()
                    )));
                }
                Some(_) => {
                    let key_line = self.line;
                    let key = self.parse_key()?;
                    self.skip_inline_ws();
                    if self.peek() != Some(':') {
                        return Err(
                            self.error_here(format!("expected ':' after key '{key}'"))
                        );
                    }
                    self.bump();
                    self.skip_inline_ws();
                    let mut value = self.parse_value()?;
                    let after = self.inline_trailing()?;
                    if self.opts.preserve_formatting {
                        if !before.is_empty() {
                            value.fmt_mut().before = before.to_string();
                        }
                        if !after.is_empty() {
                            value.fmt_mut().after = after.to_string();
                        }
                    }
                    if map.contains_key(&key) {
                        if self.opts.duplicate_key_strict {
                            return Err(ConfigError::DuplicateKey {
                                key,
                                line: key_line,
                            });
                        }
                        // Lenient: the later occurrence overwrites the
                        // earlier value, keeping the original position.
                    }
                    map.insert(&key, value);
                }
            }
        }
        let mut node: Value = ValueKind::Map(map).into();
        if self.opts.preserve_formatting && !inner.is_empty() {
            node.fmt_mut().inner = inner.to_string();
        }
        Ok(node)
    }

    fn parse_array(&mut self) -> ConfigResult<Value> {
        self.bump(); // '['
        let mut items = Vec::new();
        let inner;
        loop {
            let before = self.interstitial()?;
            match self.peek() {
                Some(']') => {
                    self.bump();
                    inner = before;
                    break;
                }
                None => return Err(self.error_here("unterminated array, expected ']'")),
                Some(',') => return Err(self.error_here("unexpected ','")),
                Some(_) => {
                    let mut value = self.parse_value()?;
                    let after = self.inline_trailing()?;
                    if self.opts.preserve_formatting {
                        if !before.is_empty() {
                            value.fmt_mut().before = before.to_string();
                        }
                        if !after.is_empty() {
                            value.fmt_mut().after = after.to_string();
                        }
                    }
                    items.push(value);
                }
            }
        }
        let mut node: Value = ValueKind::Array(items).into();
        if self.opts.preserve_formatting && !inner.is_empty() {
            node.fmt_mut().inner = inner.to_string();
        }
        Ok(node)
    }

    fn parse_key(&mut self) -> ConfigResult<String> {
        if self.peek() == Some('"') {
            return self.parse_quoted();
        }
        let mut key = String::new();
        while let Some(c) = self.peek() {
            if matches!(
                c,
                ':' | ',' | '{' | '}' | '[' | ']' | ' ' | '\t' | '\n' | '\r'
            ) {
                break;
            }
            key.push(c);
            self.bump();
        }
        if key.is_empty() {
            return Err(self.error_here("expected a key"));
        }
        Ok(key)
    }

    fn parse_value(&mut self) -> ConfigResult<Value> {
        match self.peek() {
            None => Err(self.error_here("expected a value")),
            Some('{') => self.parse_map(true),
            Some('[') => self.parse_array(),
            Some('"') => Ok(Value::from(self.parse_quoted()?)),
            Some('\n') | Some('\r') => {
                // A value on the following line must be unambiguous: a
                // container or a quoted string. Quoteless text there would
                // be indistinguishable from the next key.
                self.interstitial()?;
                match self.peek() {
                    Some('{') => self.parse_map(true),
                    Some('[') => self.parse_array(),
                    Some('"') => Ok(Value::from(self.parse_quoted()?)),
                    _ => Err(self.error_here(
                        "expected '{', '[' or a quoted string on the line after ':'",
                    )),
                }
            }
            Some(_) => self.parse_quoteless(),
        }
    }

    fn parse_quoted(&mut self) -> ConfigResult<String> {
        self.bump(); // '"'
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_here("unterminated string")),
                Some('\n') => return Err(self.error_here("unterminated string")),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('/') => out.push('/'),
                    Some('b') => out.push('\u{0008}'),
                    Some('f') => out.push('\u{000C}'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some('u') => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let digit = self
                                .bump()
                                .and_then(|c| c.to_digit(16))
                                .ok_or_else(|| self.error_here("invalid \\u escape"))?;
                            code = code * 16 + digit;
                        }
                        let c = char::from_u32(code)
                            .ok_or_else(|| self.error_here("invalid \\u escape"))?;
                        out.push(c);
                    }
                    _ => return Err(self.error_here("invalid escape sequence")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Quoteless value. A number, `true`, `false` or `null` may end at a
    /// `,`, `}` or `]` delimiter; anything else is a quoteless string
    /// running to the end of the line.
    fn parse_quoteless(&mut self) -> ConfigResult<Value> {
        let line_end = self.src[self.pos..]
            .find('\n')
            .map_or(self.src.len(), |i| self.pos + i);
        let rest = &self.src[self.pos..line_end];

        // A scalar token terminated by a delimiter, e.g. `[1, 2]` or
        // `{ a: 1 }`. Only the delimiter itself is left unconsumed.
        if let Some(idx) = rest.find([',', '}', ']']) {
            let candidate = rest[..idx].trim();
            if let Some(value) = scalar_token(candidate) {
                for _ in 0..rest[..idx].chars().count() {
                    self.bump();
                }
                return Ok(value);
            }
        }

        // Whole-line token: a scalar if the trimmed line parses as one,
        // otherwise a quoteless string (which absorbs everything, comment
        // markers included, exactly like the source format).
        let token = rest.trim_end();
        if token.is_empty() {
            return Err(self.error_here("expected a value"));
        }
        for _ in 0..rest.chars().count() {
            self.bump();
        }
        Ok(scalar_token(token).unwrap_or_else(|| Value::from(token)))
    }
}

/// Parse a trimmed token as a non-string scalar, if it is one.
fn scalar_token(token: &str) -> Option<Value> {
    match token {
        "true" => return Some(Value::from(true)),
        "false" => return Some(Value::from(false)),
        "null" => return Some(ValueKind::Null.into()),
        _ => {}
    }
    if looks_numeric(token) {
        if let Ok(v) = token.parse::<i64>() {
            return Some(Value::from(v));
        }
        if let Ok(v) = token.parse::<f64>() {
            return Some(Value::from(v));
        }
    }
    None
}

fn looks_numeric(token: &str) -> bool {
    let mut chars = token.chars();
    let first_ok = matches!(chars.next(), Some(c) if c.is_ascii_digit() || c == '-' || c == '+');
    first_ok
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
}

#[cfg(test)]
mod tests {
    use crate::codec::{DecodeOptions, decode_str};
    use crate::error::ConfigError;
    use crate::value::ValueKind;

    fn opts() -> DecodeOptions {
        DecodeOptions::default()
    }

    #[test]
    fn decodes_scalars_and_quoteless_strings() {
        let src = "a: 1\nb: true\nc: null\nd: 2.5\ne: plain text with spaces\nf: \"quoted\"\n";
        let doc = decode_str(src, &opts()).unwrap();
        assert_eq!(doc.get("a").unwrap().try_i64().unwrap(), 1);
        assert!(doc.get("b").unwrap().try_bool().unwrap());
        assert!(doc.get("c").unwrap().is_null());
        assert_eq!(doc.get("d").unwrap().try_f64().unwrap(), 2.5);
        assert_eq!(
            doc.get("e").unwrap().try_str().unwrap(),
            "plain text with spaces"
        );
        assert_eq!(doc.get("f").unwrap().try_str().unwrap(), "quoted");
    }

    #[test]
    fn root_braces_are_optional() {
        let bare = decode_str("x: 1\ny: 2\n", &opts()).unwrap();
        let braced = decode_str("{\n  x: 1\n  y: 2\n}\n", &opts()).unwrap();
        assert_eq!(bare, braced);
    }

    #[test]
    fn key_order_is_preserved() {
        let doc = decode_str("zeta: 1\nalpha: 2\nmid: 3\n", &opts()).unwrap();
        let ValueKind::Map(map) = doc.kind() else {
            panic!("expected map root");
        };
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_key_strict_vs_lenient() {
        let src = "a: 1\na: 2\n";
        let strict = DecodeOptions {
            duplicate_key_strict: true,
            ..opts()
        };
        match decode_str(src, &strict) {
            Err(ConfigError::DuplicateKey { key, line }) => {
                assert_eq!(key, "a");
                assert_eq!(line, 2);
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
        let doc = decode_str(src, &opts()).unwrap();
        assert_eq!(doc.get("a").unwrap().try_i64().unwrap(), 2);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn nested_containers() {
        let src = "outer: {\n  inner: [1, 2, 3]\n  flag: false\n}\n";
        let doc = decode_str(src, &opts()).unwrap();
        let outer = doc.get("outer").unwrap();
        let arr = outer.get("inner").unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.at(2).unwrap().try_i64().unwrap(), 3);
        assert!(!outer.get("flag").unwrap().try_bool().unwrap());
    }

    #[test]
    fn comments_are_captured_as_formatting() {
        let src = "# leading\nalpha: 1\n\n// gap above beta\nbeta: 2\n";
        let doc = decode_str(src, &opts()).unwrap();
        let beta = doc.get("beta").unwrap();
        assert!(beta.fmt().unwrap().before.contains("gap above beta"));
        // Text ahead of the first member belongs to the root node.
        assert!(doc.fmt().unwrap().before.contains("# leading"));
    }

    #[test]
    fn formatting_discarded_when_disabled() {
        let src = "# comment\nalpha: 1\n";
        let plain = DecodeOptions {
            preserve_formatting: false,
            ..opts()
        };
        let doc = decode_str(src, &plain).unwrap();
        assert!(doc.get("alpha").unwrap().fmt().is_none());
        assert!(doc.fmt().is_none());
    }

    #[test]
    fn syntax_error_reports_position() {
        match decode_str("alpha 1\n", &opts()) {
            Err(ConfigError::Syntax { line, message, .. }) => {
                assert_eq!(line, 1);
                assert!(message.contains("expected ':'"), "message: {message}");
            }
            other => panic!("expected Syntax, got {other:?}"),
        }
        match decode_str("a: 1\nb: [1, 2\n", &opts()) {
            Err(ConfigError::Syntax { line, .. }) => assert!(line >= 2),
            other => panic!("expected Syntax, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_comment_only_input_is_an_empty_map() {
        let doc = decode_str("", &opts()).unwrap();
        assert!(doc.is_map());
        assert!(doc.is_empty());
        let doc = decode_str("# nothing here\n\n", &opts()).unwrap();
        assert!(doc.is_map());
        assert!(doc.is_empty());
    }

    #[test]
    fn numeric_looking_text_stays_a_string() {
        let doc = decode_str("v: 7 apples\n", &opts()).unwrap();
        assert_eq!(doc.get("v").unwrap().try_str().unwrap(), "7 apples");
    }
}
