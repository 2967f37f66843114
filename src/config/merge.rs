//! Defaults-overlay merge.
//!
//! Overlays a user document onto compiled-in defaults:
//! - Maps merge recursively, defaults' key order first, then override-only
//!   keys in the overrides' own order
//! - Arrays are atomic: the override replaces the default wholesale
//! - Scalars and mismatched tags: the override wins unless it is null
//!
//! Values come from the override side. Formatting metadata comes from the
//! override where it captured any, with the defaults' filling the gaps, so
//! a sparse user file inherits the documentation comments and the
//! written-back config file stays self-documenting.

use crate::value::{Map, Value, ValueKind};

/// Merge `overrides` onto `defaults`, producing the combined document.
///
/// Idempotent: `merge(d, merge(d, u)) == merge(d, u)`.
pub fn merge(defaults: &Value, overrides: &Value) -> Value {
    match (defaults.kind(), overrides.kind()) {
        (ValueKind::Map(base), ValueKind::Map(over)) => {
            let mut out = Map::new();
            for (key, base_value) in base.iter() {
                match over.get(key) {
                    Some(over_value) => out.insert(key, merge(base_value, over_value)),
                    None => out.insert(key, base_value.clone()),
                }
            }
            for (key, over_value) in over.iter() {
                if !out.contains_key(key) {
                    out.insert(key, over_value.clone());
                }
            }
            let mut node: Value = ValueKind::Map(out).into();
            node.adopt_fmt_from(overrides);
            overlay_fmt(defaults, &mut node);
            node
        }
        // Arrays are treated as atomic values for overlay purposes.
        (ValueKind::Array(_), ValueKind::Array(_)) => take_override(defaults, overrides),
        // An absent or explicitly-null override falls back to the default;
        // any other override (of any tag) takes precedence.
        (_, ValueKind::Null) => defaults.clone(),
        _ => take_override(defaults, overrides),
    }
}

fn take_override(defaults: &Value, overrides: &Value) -> Value {
    let mut node = overrides.clone();
    overlay_fmt(defaults, &mut node);
    node
}

/// Fill formatting fields the override left empty from the defaults, so an
/// overridden key without its own comment inherits the default's.
fn overlay_fmt(defaults: &Value, node: &mut Value) {
    let Some(dfmt) = defaults.fmt() else {
        return;
    };
    let fmt = node.fmt_mut();
    if fmt.before.is_empty() {
        fmt.before = dfmt.before.clone();
    }
    if fmt.after.is_empty() {
        fmt.after = dfmt.after.clone();
    }
    if fmt.inner.is_empty() {
        fmt.inner = dfmt.inner.clone();
    }
}
