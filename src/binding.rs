//! Live two-way binding between document fields and interactive controls.
//!
//! A [`FieldBinding`] ties one top-level key to one primary control, plus
//! optional twin controls showing the same field (a slider and its numeric
//! edit) and dependent controls whose enabled state follows a boolean
//! field's truthiness. Bindings store the key, never a reference into the
//! document, so a control outliving the document is not a hazard.
//!
//! All initial control state comes from the lenient coercion accessors: the
//! document may be mid-edit or carry a mismatched tag from a hand-written
//! file, and the bound surface must never crash over that.
//!
//! Synchronization invariant: the control's displayed state and the field's
//! coerced value are equal immediately after binding and after every
//! completed edit in either direction. Re-applying an unchanged value is a
//! no-op on the document, which is what prevents feedback loops between
//! twin controls.

use tracing::debug;

use crate::error::ConfigResult;
use crate::value::{self, Value};

/// Opaque handle to a control owned by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(pub usize);

/// Value carried between the document and a control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// The external control surface, as seen by the binding layer.
pub trait ControlHost {
    /// Push a value into a control's display.
    fn set_control_value(&mut self, id: ControlId, value: ControlValue);
    /// Enable or disable a control.
    fn set_control_enabled(&mut self, id: ControlId, enabled: bool);
}

/// Outcome of routing a control edit into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The document field changed and twins/dependents were updated.
    Updated,
    /// The value already matched the field; nothing was written.
    Unchanged,
    /// No binding covers the control.
    Unbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindingKind {
    Bool,
    Int,
    Text,
}

/// One field-to-control association.
#[derive(Debug)]
struct FieldBinding {
    key: String,
    kind: BindingKind,
    /// Primary control plus any twins showing the same field.
    controls: Vec<ControlId>,
    /// Controls whose enabled state follows the field's truthiness.
    /// Only meaningful for bool bindings.
    dependents: Vec<ControlId>,
}

/// Owns all field bindings and mediates every edit.
#[derive(Debug, Default)]
pub struct Binder {
    bindings: Vec<FieldBinding>,
}

impl Binder {
    pub fn new() -> Self {
        Binder::default()
    }

    /// Bind a boolean field to a checkbox-style control. The control's
    /// initial state comes from the field's truthiness, and `dependents`
    /// are enabled or disabled from it immediately.
    pub fn bind_bool(
        &mut self,
        host: &mut dyn ControlHost,
        doc: &Value,
        key: &str,
        control: ControlId,
        dependents: &[ControlId],
    ) {
        let current = field(doc, key).is_truthy();
        host.set_control_value(control, ControlValue::Bool(current));
        for dep in dependents {
            host.set_control_enabled(*dep, current);
        }
        self.bindings.push(FieldBinding {
            key: key.to_string(),
            kind: BindingKind::Bool,
            controls: vec![control],
            dependents: dependents.to_vec(),
        });
    }

    /// Bind an integer field to one or more controls showing the same
    /// value (for example a slider and its numeric edit).
    pub fn bind_int(
        &mut self,
        host: &mut dyn ControlHost,
        doc: &Value,
        key: &str,
        controls: &[ControlId],
    ) {
        let current = field(doc, key).as_i64();
        for id in controls {
            host.set_control_value(*id, ControlValue::Int(current));
        }
        self.bindings.push(FieldBinding {
            key: key.to_string(),
            kind: BindingKind::Int,
            controls: controls.to_vec(),
            dependents: Vec::new(),
        });
    }

    /// Bind a string field to a text control.
    pub fn bind_text(
        &mut self,
        host: &mut dyn ControlHost,
        doc: &Value,
        key: &str,
        control: ControlId,
    ) {
        let current = field(doc, key).as_string();
        host.set_control_value(control, ControlValue::Text(current));
        self.bindings.push(FieldBinding {
            key: key.to_string(),
            kind: BindingKind::Text,
            controls: vec![control],
            dependents: Vec::new(),
        });
    }

    /// The key a control is bound to, if any.
    pub fn key_for(&self, id: ControlId) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.controls.contains(&id))
            .map(|b| b.key.as_str())
    }

    /// Route a completed control edit into the document.
    ///
    /// Writes the coerced value through strict `set`, pushes the new value
    /// into twin controls (not the originating one), and re-evaluates
    /// dependent enablement for bool bindings. Idempotent: a value equal to
    /// the field's current coerced value performs no document write.
    pub fn apply(
        &self,
        host: &mut dyn ControlHost,
        doc: &mut Value,
        id: ControlId,
        value: ControlValue,
    ) -> ConfigResult<Applied> {
        let Some(binding) = self.bindings.iter().find(|b| b.controls.contains(&id)) else {
            return Ok(Applied::Unbound);
        };
        match binding.kind {
            BindingKind::Bool => {
                let next = coerce_bool(&value);
                let current = field(doc, &binding.key);
                // Compare with the same coercion that initialized the
                // control, so a mistyped truthy field (enable: 1) can still
                // be toggled off.
                if !current.is_null() && current.is_truthy() == next {
                    return Ok(Applied::Unchanged);
                }
                doc.set(&binding.key, next)?;
                debug!(key = %binding.key, value = next, "bound field updated");
                for twin in binding.controls.iter().filter(|c| **c != id) {
                    host.set_control_value(*twin, ControlValue::Bool(next));
                }
                for dep in &binding.dependents {
                    host.set_control_enabled(*dep, next);
                }
            }
            BindingKind::Int => {
                let next = coerce_int(&value);
                let current = field(doc, &binding.key);
                if !current.is_null() && current.as_i64() == next {
                    return Ok(Applied::Unchanged);
                }
                doc.set(&binding.key, next)?;
                debug!(key = %binding.key, value = next, "bound field updated");
                for twin in binding.controls.iter().filter(|c| **c != id) {
                    host.set_control_value(*twin, ControlValue::Int(next));
                }
            }
            BindingKind::Text => {
                let next = coerce_text(value);
                let current = field(doc, &binding.key);
                if !current.is_null() && current.as_string() == next {
                    return Ok(Applied::Unchanged);
                }
                doc.set(&binding.key, next.clone())?;
                debug!(key = %binding.key, value = %next, "bound field updated");
                for twin in binding.controls.iter().filter(|c| **c != id) {
                    host.set_control_value(*twin, ControlValue::Text(next.clone()));
                }
            }
        }
        Ok(Applied::Updated)
    }
}

/// Lenient field lookup: a missing key or a non-map document reads as null.
fn field<'a>(doc: &'a Value, key: &str) -> &'a Value {
    doc.get(key).unwrap_or(&value::NULL)
}

fn coerce_bool(value: &ControlValue) -> bool {
    match value {
        ControlValue::Bool(b) => *b,
        ControlValue::Int(i) => *i != 0,
        ControlValue::Text(t) => t == "true",
    }
}

fn coerce_int(value: &ControlValue) -> i64 {
    match value {
        ControlValue::Bool(b) => i64::from(*b),
        ControlValue::Int(i) => *i,
        ControlValue::Text(t) => t.trim().parse().unwrap_or(0),
    }
}

fn coerce_text(value: ControlValue) -> String {
    match value {
        ControlValue::Bool(b) => b.to_string(),
        ControlValue::Int(i) => i.to_string(),
        ControlValue::Text(t) => t,
    }
}
