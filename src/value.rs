//! Dynamically-typed configuration document tree.
//!
//! A [`Value`] is one node of the document: a tagged variant plus optional
//! formatting metadata captured by the codec (comments and blank lines).
//! Maps preserve insertion order, which is what makes a decoded document
//! re-encode with its keys in the original order.
//!
//! Two access families exist side by side:
//! - **strict** accessors (`get`, `set`, `try_i64`, ...) return
//!   `Result<_, ConfigError>` and fail fast on a wrong tag;
//! - **lenient** accessors (`as_i64`, `as_str`, `is_truthy`, ...) are total:
//!   a mismatched tag yields the type's zero value and never an error. UI
//!   code uses only the lenient family so a half-edited document can never
//!   crash the bound surface.

use crate::error::{ConfigError, ConfigResult};

/// Formatting metadata attached to a node by the codec.
///
/// The text is opaque to application logic; it is captured verbatim on
/// decode and replayed verbatim on encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fmt {
    /// Whitespace and comments preceding the node, including newlines.
    pub before: String,
    /// Same-line trailing comment after the value, without the newline.
    pub after: String,
    /// For containers: text between the last child and the closing
    /// delimiter (the whole interior for empty containers). For the root
    /// map this is the text after the final entry up to end of input.
    pub inner: String,
}

impl Fmt {
    /// True when no formatting was captured at all.
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty() && self.inner.is_empty()
    }
}

/// The tag and payload of a document node.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// Explicit null, and the state of a freshly created node.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// 64-bit signed integer scalar.
    Int(i64),
    /// Double-precision float scalar.
    Double(f64),
    /// UTF-8 string scalar.
    Str(String),
    /// Ordered sequence of nodes.
    Array(Vec<Value>),
    /// Insertion-ordered key/value pairs with unique keys.
    Map(Map),
}

/// One node of the configuration document.
#[derive(Debug, Clone, Default)]
pub struct Value {
    kind: ValueKind,
    /// Boxed so that scalar nodes without comments stay small.
    fmt: Option<Box<Fmt>>,
}

impl Default for ValueKind {
    fn default() -> Self {
        ValueKind::Null
    }
}

/// Equality compares the value content only; formatting metadata is
/// deliberately ignored so that a re-decoded document compares equal to its
/// comment-free construction.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Shared immutable null node, handy for lenient lookups of missing fields.
pub static NULL: Value = Value {
    kind: ValueKind::Null,
    fmt: None,
};

impl Value {
    /// A null node.
    pub fn null() -> Self {
        Value::default()
    }

    /// An empty map node.
    pub fn map() -> Self {
        ValueKind::Map(Map::new()).into()
    }

    /// An empty array node.
    pub fn array() -> Self {
        ValueKind::Array(Vec::new()).into()
    }

    /// The node's tag and payload.
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Replace the node's tag and payload, keeping formatting metadata.
    /// This is how a field's type changes at runtime: strict access reflects
    /// the new tag immediately.
    pub fn set_kind(&mut self, kind: ValueKind) {
        self.kind = kind;
    }

    /// Short tag name for diagnostics and `TypeMismatch` errors.
    pub fn tag_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Null => "null",
            ValueKind::Bool(_) => "bool",
            ValueKind::Int(_) => "int",
            ValueKind::Double(_) => "double",
            ValueKind::Str(_) => "string",
            ValueKind::Array(_) => "array",
            ValueKind::Map(_) => "map",
        }
    }

    /// Formatting metadata, if any was captured.
    pub fn fmt(&self) -> Option<&Fmt> {
        self.fmt.as_deref()
    }

    /// Formatting metadata for writing, created on demand.
    pub fn fmt_mut(&mut self) -> &mut Fmt {
        self.fmt.get_or_insert_with(Box::default)
    }

    /// Attach formatting metadata wholesale (used by the codec).
    pub fn set_fmt(&mut self, fmt: Fmt) {
        if fmt.is_empty() {
            self.fmt = None;
        } else {
            self.fmt = Some(Box::new(fmt));
        }
    }

    /// Transfer another node's formatting onto this one.
    pub fn adopt_fmt_from(&mut self, other: &Value) {
        self.fmt = other.fmt.clone();
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, ValueKind::Map(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ValueKind::Array(_))
    }

    /// Element count for containers, 0 for everything else.
    pub fn len(&self) -> usize {
        match &self.kind {
            ValueKind::Array(items) => items.len(),
            ValueKind::Map(map) => map.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- strict access -----------------------------------------------------

    /// Strict map lookup. Fails if the node is not a map or the key is
    /// absent.
    pub fn get(&self, key: &str) -> ConfigResult<&Value> {
        match &self.kind {
            ValueKind::Map(map) => map.get(key).ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            }),
            _ => Err(self.mismatch("map")),
        }
    }

    /// Strict mutable map lookup. Mutation through the reference mutates the
    /// document.
    pub fn get_mut(&mut self, key: &str) -> ConfigResult<&mut Value> {
        let actual = self.tag_name();
        match &mut self.kind {
            ValueKind::Map(map) => map.get_mut(key).ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            }),
            _ => Err(ConfigError::TypeMismatch {
                expected: "map",
                actual,
            }),
        }
    }

    /// Strict array indexing.
    pub fn at(&self, index: usize) -> ConfigResult<&Value> {
        match &self.kind {
            ValueKind::Array(items) => items.get(index).ok_or(ConfigError::IndexOutOfRange {
                index,
                len: items.len(),
            }),
            _ => Err(self.mismatch("array")),
        }
    }

    /// Strict mutable array indexing.
    pub fn at_mut(&mut self, index: usize) -> ConfigResult<&mut Value> {
        let actual = self.tag_name();
        match &mut self.kind {
            ValueKind::Array(items) => {
                let len = items.len();
                items
                    .get_mut(index)
                    .ok_or(ConfigError::IndexOutOfRange { index, len })
            }
            _ => Err(ConfigError::TypeMismatch {
                expected: "array",
                actual,
            }),
        }
    }

    /// Strict keyed write. Creates the key if absent. A `Null` node is
    /// promoted to a map on its first keyed write; any other non-map node is
    /// a `TypeMismatch`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> ConfigResult<()> {
        if self.is_null() {
            self.kind = ValueKind::Map(Map::new());
        }
        let actual = self.tag_name();
        match &mut self.kind {
            ValueKind::Map(map) => {
                map.insert(key, value.into());
                Ok(())
            }
            _ => Err(ConfigError::TypeMismatch {
                expected: "map",
                actual,
            }),
        }
    }

    /// Strict indexed write over an existing element.
    pub fn set_index(&mut self, index: usize, value: impl Into<Value>) -> ConfigResult<()> {
        let actual = self.tag_name();
        match &mut self.kind {
            ValueKind::Array(items) => {
                let len = items.len();
                match items.get_mut(index) {
                    Some(slot) => {
                        let fmt = slot.fmt.take();
                        *slot = value.into();
                        slot.fmt = fmt;
                        Ok(())
                    }
                    None => Err(ConfigError::IndexOutOfRange { index, len }),
                }
            }
            _ => Err(ConfigError::TypeMismatch {
                expected: "array",
                actual,
            }),
        }
    }

    /// Append to an array. A `Null` node is promoted to an empty array
    /// first.
    pub fn push(&mut self, value: impl Into<Value>) -> ConfigResult<()> {
        if self.is_null() {
            self.kind = ValueKind::Array(Vec::new());
        }
        let actual = self.tag_name();
        match &mut self.kind {
            ValueKind::Array(items) => {
                items.push(value.into());
                Ok(())
            }
            _ => Err(ConfigError::TypeMismatch {
                expected: "array",
                actual,
            }),
        }
    }

    /// Strict integer read.
    pub fn try_i64(&self) -> ConfigResult<i64> {
        match self.kind {
            ValueKind::Int(v) => Ok(v),
            _ => Err(self.mismatch("int")),
        }
    }

    /// Strict numeric read; accepts both integer and double tags.
    pub fn try_f64(&self) -> ConfigResult<f64> {
        match self.kind {
            ValueKind::Int(v) => Ok(v as f64),
            ValueKind::Double(v) => Ok(v),
            _ => Err(self.mismatch("double")),
        }
    }

    /// Strict string read.
    pub fn try_str(&self) -> ConfigResult<&str> {
        match &self.kind {
            ValueKind::Str(s) => Ok(s),
            _ => Err(self.mismatch("string")),
        }
    }

    /// Strict bool read.
    pub fn try_bool(&self) -> ConfigResult<bool> {
        match self.kind {
            ValueKind::Bool(v) => Ok(v),
            _ => Err(self.mismatch("bool")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ConfigError {
        ConfigError::TypeMismatch {
            expected,
            actual: self.tag_name(),
        }
    }

    // --- lenient coercion --------------------------------------------------

    /// Coerce to an integer. Doubles truncate, bools map to 0/1, numeric
    /// strings parse; everything else is 0. Never fails, never mutates.
    pub fn as_i64(&self) -> i64 {
        match &self.kind {
            ValueKind::Int(v) => *v,
            ValueKind::Double(v) => *v as i64,
            ValueKind::Bool(b) => i64::from(*b),
            ValueKind::Str(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Coerce to a double. Same rules as [`Value::as_i64`].
    pub fn as_f64(&self) -> f64 {
        match &self.kind {
            ValueKind::Int(v) => *v as f64,
            ValueKind::Double(v) => *v,
            ValueKind::Bool(b) => f64::from(u8::from(*b)),
            ValueKind::Str(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Borrow the string payload, or `""` for any other tag.
    pub fn as_str(&self) -> &str {
        match &self.kind {
            ValueKind::Str(s) => s,
            _ => "",
        }
    }

    /// Render any scalar as text; containers and null yield `""`.
    pub fn as_string(&self) -> String {
        match &self.kind {
            ValueKind::Str(s) => s.clone(),
            ValueKind::Int(v) => v.to_string(),
            ValueKind::Double(v) => v.to_string(),
            ValueKind::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Coerce to a bool: the `Bool` payload, or `false` for any other tag.
    pub fn as_bool(&self) -> bool {
        match self.kind {
            ValueKind::Bool(b) => b,
            _ => false,
        }
    }

    /// Emptiness test used for checkbox initial state: null and each type's
    /// zero value are falsy, everything else truthy.
    pub fn is_truthy(&self) -> bool {
        match &self.kind {
            ValueKind::Null => false,
            ValueKind::Bool(b) => *b,
            ValueKind::Int(v) => *v != 0,
            ValueKind::Double(v) => *v != 0.0,
            ValueKind::Str(s) => !s.is_empty(),
            ValueKind::Array(items) => !items.is_empty(),
            ValueKind::Map(map) => !map.is_empty(),
        }
    }
}

impl From<ValueKind> for Value {
    fn from(kind: ValueKind) -> Self {
        Value { kind, fmt: None }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        ValueKind::Bool(v).into()
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        ValueKind::Int(v).into()
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        ValueKind::Double(v).into()
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        ValueKind::Str(v.to_string()).into()
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        ValueKind::Str(v).into()
    }
}

/// Insertion-ordered map with unique keys.
///
/// Backed by a vector of pairs: config documents are small and the linear
/// scan keeps declaration order for free, which the codec relies on to
/// reproduce the source key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Map::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or replace. Replacing keeps the key's original position (so a
    /// lenient decode of duplicate keys does not reorder the document) and
    /// keeps the old node's formatting when the new value carries none, so
    /// an edited field re-encodes with its comments intact.
    pub fn insert(&mut self, key: &str, mut value: Value) {
        match self.get_mut(key) {
            Some(slot) => {
                if value.fmt().is_none() {
                    value.adopt_fmt_from(slot);
                }
                *slot = value;
            }
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_access_on_wrong_tag() {
        let v = Value::from(42i64);
        assert!(matches!(
            v.get("x"),
            Err(ConfigError::TypeMismatch { expected: "map", actual: "int" })
        ));
        assert!(matches!(
            v.at(0),
            Err(ConfigError::TypeMismatch { expected: "array", .. })
        ));
        assert!(matches!(v.try_str(), Err(ConfigError::TypeMismatch { .. })));
        assert_eq!(v.try_i64().unwrap(), 42);
    }

    #[test]
    fn null_promotes_to_map_on_keyed_write() {
        let mut v = Value::null();
        v.set("alpha", 7i64).unwrap();
        assert!(v.is_map());
        assert_eq!(v.get("alpha").unwrap().try_i64().unwrap(), 7);

        // A scalar does not promote.
        let mut s = Value::from("text");
        assert!(s.set("alpha", 7i64).is_err());
    }

    #[test]
    fn null_promotes_to_array_on_push() {
        let mut v = Value::null();
        v.push(1i64).unwrap();
        v.push(2i64).unwrap();
        assert!(v.is_array());
        assert_eq!(v.at(1).unwrap().try_i64().unwrap(), 2);
        assert!(matches!(
            v.at(5),
            Err(ConfigError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn tag_switch_is_visible_to_strict_access() {
        let mut doc = Value::map();
        doc.set("field", 10i64).unwrap();
        assert_eq!(doc.get("field").unwrap().try_i64().unwrap(), 10);

        doc.set("field", "now a string").unwrap();
        assert!(doc.get("field").unwrap().try_i64().is_err());
        assert_eq!(doc.get("field").unwrap().try_str().unwrap(), "now a string");
    }

    #[test]
    fn lenient_coercion_is_total() {
        let samples = vec![
            Value::null(),
            Value::from(true),
            Value::from(-3i64),
            Value::from(2.5f64),
            Value::from("128"),
            Value::from("not a number"),
            Value::array(),
            Value::map(),
        ];
        for v in &samples {
            // No panic and a value of the requested type for every tag.
            let _ = v.as_i64();
            let _ = v.as_f64();
            let _ = v.as_str();
            let _ = v.as_string();
            let _ = v.as_bool();
            let _ = v.is_truthy();
        }
        assert_eq!(Value::from("128").as_i64(), 128);
        assert_eq!(Value::from("not a number").as_i64(), 0);
        assert_eq!(Value::from(2.9f64).as_i64(), 2);
        assert_eq!(Value::from(true).as_i64(), 1);
        assert_eq!(Value::null().as_str(), "");
        assert_eq!(Value::from(64i64).as_string(), "64");
        assert!(!Value::from(0i64).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::array().is_truthy());
    }

    #[test]
    fn map_keeps_insertion_order_and_replaces_in_place() {
        let mut m = Map::new();
        m.insert("b", Value::from(1i64));
        m.insert("a", Value::from(2i64));
        m.insert("c", Value::from(3i64));
        m.insert("a", Value::from(9i64));
        let keys: Vec<&str> = m.keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(m.get("a").unwrap().try_i64().unwrap(), 9);
    }

    #[test]
    fn keyed_write_keeps_existing_formatting() {
        let mut doc = Value::map();
        let mut original = Value::from(2030i64);
        original.fmt_mut().before = "\n// These numbers can be modified in the UI.\n".to_string();
        doc.set("alpha", original).unwrap();

        doc.set("alpha", 500i64).unwrap();
        let node = doc.get("alpha").unwrap();
        assert_eq!(node.try_i64().unwrap(), 500);
        assert!(node.fmt().unwrap().before.contains("modified in the UI"));
    }

    #[test]
    fn equality_ignores_formatting() {
        let mut a = Value::from(5i64);
        a.fmt_mut().before = "# comment\n".to_string();
        let b = Value::from(5i64);
        assert_eq!(a, b);
    }

    #[test]
    fn set_index_keeps_element_formatting() {
        let mut v = Value::array();
        let mut elem = Value::from(1i64);
        elem.fmt_mut().before = "\n  ".to_string();
        v.push(elem).unwrap();
        v.set_index(0, 2i64).unwrap();
        assert_eq!(v.at(0).unwrap().try_i64().unwrap(), 2);
        assert_eq!(v.at(0).unwrap().fmt().unwrap().before, "\n  ");
    }
}
