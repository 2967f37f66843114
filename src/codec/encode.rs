//! Hjson-style document writer.
//!
//! Nodes carrying formatting metadata have their captured text replayed
//! verbatim; nodes without it are pretty printed with two-space indentation.
//! Encoding is total: any well-formed tree renders to text.

use super::EncodeOptions;
use crate::value::{Map, Value, ValueKind};

pub(super) struct Writer<'a> {
    opts: &'a EncodeOptions,
}

impl<'a> Writer<'a> {
    pub(super) fn new(opts: &'a EncodeOptions) -> Self {
        Writer { opts }
    }

    pub(super) fn document(&self, value: &Value) -> String {
        let mut out = String::new();
        if let Some(fmt) = value.fmt() {
            out.push_str(&fmt.before);
        }
        match value.kind() {
            ValueKind::Map(map) if self.opts.omit_root_braces => {
                self.members(&mut out, map, 0, true);
                if let Some(fmt) = value.fmt() {
                    out.push_str(&fmt.inner);
                }
            }
            _ => self.value(&mut out, value, 0),
        }
        if let Some(fmt) = value.fmt() {
            out.push_str(&fmt.after);
        }
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    fn value(&self, out: &mut String, value: &Value, depth: usize) {
        match value.kind() {
            ValueKind::Null => out.push_str("null"),
            ValueKind::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            ValueKind::Int(v) => out.push_str(&v.to_string()),
            ValueKind::Double(v) => out.push_str(&double_token(*v)),
            ValueKind::Str(s) => self.string(out, s),
            ValueKind::Array(items) => self.array(out, value, items, depth),
            ValueKind::Map(map) => self.map(out, value, map, depth),
        }
    }

    /// Members of a map, one per line. `bare_root` suppresses the leading
    /// separator of the first member so a brace-less document starts at
    /// column one.
    fn members(&self, out: &mut String, map: &Map, member_depth: usize, bare_root: bool) {
        for (i, (key, value)) in map.iter().enumerate() {
            match value.fmt() {
                Some(fmt) if !fmt.before.is_empty() => out.push_str(&fmt.before),
                _ => {
                    if !(bare_root && i == 0) {
                        out.push('\n');
                        push_indent(out, member_depth);
                    }
                }
            }
            self.key(out, key);
            out.push_str(": ");
            self.value(out, value, member_depth);
            if let Some(fmt) = value.fmt() {
                out.push_str(&fmt.after);
            }
        }
    }

    fn map(&self, out: &mut String, node: &Value, map: &Map, depth: usize) {
        let inner = node.fmt().map(|f| f.inner.as_str()).unwrap_or("");
        if map.is_empty() && inner.is_empty() {
            out.push_str("{}");
            return;
        }
        out.push('{');
        self.members(out, map, depth + 1, false);
        if inner.is_empty() {
            out.push('\n');
            push_indent(out, depth);
        } else {
            out.push_str(inner);
        }
        out.push('}');
    }

    fn array(&self, out: &mut String, node: &Value, items: &[Value], depth: usize) {
        let inner = node.fmt().map(|f| f.inner.as_str()).unwrap_or("");
        if items.is_empty() {
            out.push('[');
            out.push_str(inner);
            out.push(']');
            return;
        }
        if self.array_is_inline(items, inner) {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.value(out, item, depth);
            }
            out.push(']');
            return;
        }
        out.push('[');
        for item in items {
            match item.fmt() {
                Some(fmt) if fmt.before.contains('\n') => out.push_str(&fmt.before),
                _ => {
                    out.push('\n');
                    push_indent(out, depth + 1);
                }
            }
            self.value(out, item, depth + 1);
            if let Some(fmt) = item.fmt() {
                out.push_str(&fmt.after);
            }
        }
        if inner.contains('\n') {
            out.push_str(inner);
        } else {
            out.push('\n');
            push_indent(out, depth);
        }
        out.push(']');
    }

    /// Scalar-only arrays with no captured newlines render on one line.
    fn array_is_inline(&self, items: &[Value], inner: &str) -> bool {
        if inner.contains('\n') {
            return false;
        }
        items.iter().all(|item| {
            let scalar = !matches!(item.kind(), ValueKind::Array(_) | ValueKind::Map(_));
            let flat = item
                .fmt()
                .map(|f| !f.before.contains('\n') && f.after.is_empty())
                .unwrap_or(true);
            scalar && flat
        })
    }

    fn key(&self, out: &mut String, key: &str) {
        let plain = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if plain {
            out.push_str(key);
        } else {
            push_quoted(out, key);
        }
    }

    fn string(&self, out: &mut String, s: &str) {
        if quoteless_safe(s) {
            out.push_str(s);
        } else {
            push_quoted(out, s);
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// A string may render without quotes when re-reading it reproduces the
/// same string: no line breaks, no surrounding whitespace, a first
/// character that cannot open a container/comment/quote, no delimiter
/// characters, and a token that does not read back as a number or keyword.
fn quoteless_safe(s: &str) -> bool {
    if s.is_empty() || s.trim() != s {
        return false;
    }
    if s.contains(['\n', '\r', ',', '{', '}', '[', ']']) {
        return false;
    }
    let first = s.chars().next().unwrap_or_default();
    if matches!(first, '#' | '"' | '\'' | ':') || s.starts_with("//") || s.starts_with("/*") {
        return false;
    }
    if matches!(s, "true" | "false" | "null") {
        return false;
    }
    // Anything that would read back as a number must be quoted.
    s.parse::<f64>().is_err() || !first.is_ascii_digit() && !matches!(first, '-' | '+' | '.')
}

fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn double_token(v: f64) -> String {
    if !v.is_finite() {
        return "null".to_string();
    }
    let s = v.to_string();
    if s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{s}.0")
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::{DecodeOptions, EncodeOptions, decode_str, encode_string};
    use crate::value::Value;

    #[test]
    fn pretty_prints_without_formatting_metadata() {
        let mut doc = Value::map();
        doc.set("enable", true).unwrap();
        doc.set("alpha", 2030i64).unwrap();
        doc.set("name", "example").unwrap();
        let text = encode_string(&doc, &EncodeOptions { omit_root_braces: true });
        assert_eq!(text, "enable: true\nalpha: 2030\nname: example\n");
    }

    #[test]
    fn braced_output_when_not_omitting() {
        let mut doc = Value::map();
        doc.set("alpha", 1i64).unwrap();
        let text = encode_string(&doc, &EncodeOptions::default());
        assert_eq!(text, "{\n  alpha: 1\n}\n");
    }

    #[test]
    fn strings_needing_quotes_are_quoted() {
        let mut doc = Value::map();
        doc.set("a", "has, comma").unwrap();
        doc.set("b", "123").unwrap();
        doc.set("c", "true").unwrap();
        doc.set("d", " padded ").unwrap();
        let text = encode_string(&doc, &EncodeOptions { omit_root_braces: true });
        assert_eq!(
            text,
            "a: \"has, comma\"\nb: \"123\"\nc: \"true\"\nd: \" padded \"\n"
        );
        // And they survive a round trip with their tags intact.
        let back = decode_str(&text, &DecodeOptions::default()).unwrap();
        assert_eq!(back.get("b").unwrap().try_str().unwrap(), "123");
        assert_eq!(back.get("c").unwrap().try_str().unwrap(), "true");
    }

    #[test]
    fn scalar_arrays_render_inline() {
        let mut doc = Value::map();
        let mut arr = Value::array();
        arr.push(1i64).unwrap();
        arr.push(2i64).unwrap();
        arr.push(3i64).unwrap();
        doc.set("items", arr).unwrap();
        let text = encode_string(&doc, &EncodeOptions { omit_root_braces: true });
        assert_eq!(text, "items: [1, 2, 3]\n");
    }

    #[test]
    fn nested_maps_indent() {
        let mut inner = Value::map();
        inner.set("x", 1i64).unwrap();
        let mut doc = Value::map();
        doc.set("outer", inner).unwrap();
        let text = encode_string(&doc, &EncodeOptions { omit_root_braces: true });
        assert_eq!(text, "outer: {\n  x: 1\n}\n");
    }

    #[test]
    fn doubles_keep_their_tag() {
        let mut doc = Value::map();
        doc.set("d", 2.0f64).unwrap();
        let text = encode_string(&doc, &EncodeOptions { omit_root_braces: true });
        assert_eq!(text, "d: 2.0\n");
        let back = decode_str(&text, &DecodeOptions::default()).unwrap();
        assert_eq!(back.get("d").unwrap().try_f64().unwrap(), 2.0);
    }
}
