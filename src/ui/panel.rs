//! Line-oriented terminal rendition of the demo control surface.
//!
//! The layout mirrors the original demo: an "Enable alpha" checkbox gating
//! the Alpha slider pair, Beta and Gamma slider pairs, an editable text
//! field, and a Run button that spawns the background worker. Every slider
//! has a numeric-edit twin bound to the same document field, which is what
//! exercises the cross-control synchronization rules.

use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::info;

use crate::binding::{Applied, Binder, ControlHost, ControlId, ControlValue};
use crate::config::keys;
use crate::value::Value;

use super::{UiEvent, worker};

/// How long the simulated background work takes.
const WORK_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    Checkbox,
    Slider { min: i64, max: i64, tick: i64 },
    NumberEdit { min: i64, max: i64 },
    TextEdit,
    Button,
}

/// One control owned by the panel.
#[derive(Debug, Clone)]
pub struct Control {
    pub name: String,
    pub label: String,
    pub kind: ControlKind,
    pub value: ControlValue,
    pub enabled: bool,
}

impl Control {
    fn new(name: &str, label: &str, kind: ControlKind, value: ControlValue) -> Self {
        Control {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            value,
            enabled: true,
        }
    }
}

/// The terminal control surface. Implements [`ControlHost`] so the binding
/// layer can push values and enablement into it.
#[derive(Debug)]
pub struct Panel {
    controls: Vec<Control>,
    width: i64,
    height: i64,
    working: bool,
}

impl ControlHost for Panel {
    fn set_control_value(&mut self, id: ControlId, value: ControlValue) {
        if let Some(control) = self.controls.get_mut(id.0) {
            control.value = value;
        }
    }

    fn set_control_enabled(&mut self, id: ControlId, enabled: bool) {
        if let Some(control) = self.controls.get_mut(id.0) {
            control.enabled = enabled;
        }
    }
}

impl Panel {
    fn new(width: i64, height: i64) -> Self {
        Panel {
            controls: Vec::new(),
            width,
            height,
            working: false,
        }
    }

    fn add(&mut self, control: Control) -> ControlId {
        self.controls.push(control);
        ControlId(self.controls.len() - 1)
    }

    /// Panel dimensions, written back into the document at shutdown.
    pub fn size(&self) -> (i64, i64) {
        (self.width, self.height)
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id.0)
    }

    /// Look up a control by its command name.
    pub fn find(&self, name: &str) -> Option<ControlId> {
        self.controls
            .iter()
            .position(|c| c.name == name)
            .map(ControlId)
    }

    /// A slider and its numeric-edit twin, both bound to `key`.
    fn add_slider_pair(
        &mut self,
        binder: &mut Binder,
        doc: &Value,
        label: &str,
        name: &str,
        min: i64,
        max: i64,
        tick: i64,
        key: &str,
    ) -> (ControlId, ControlId) {
        let slider = self.add(Control::new(
            name,
            label,
            ControlKind::Slider { min, max, tick },
            ControlValue::Int(0),
        ));
        let edit = self.add(Control::new(
            &format!("{name}-box"),
            label,
            ControlKind::NumberEdit { min, max },
            ControlValue::Int(0),
        ));
        binder.bind_int(self, doc, key, &[slider, edit]);
        (slider, edit)
    }

    /// Build the demo surface over the merged document, wiring every
    /// control through the binder.
    pub fn build_demo(doc: &Value, width: i64, height: i64) -> (Panel, Binder) {
        let mut panel = Panel::new(width, height);
        let mut binder = Binder::new();

        let (alpha_slider, alpha_edit) = panel.add_slider_pair(
            &mut binder,
            doc,
            "Alpha",
            "alpha",
            0,
            3000,
            500,
            keys::ALPHA,
        );

        let checkbox = panel.add(Control::new(
            "enable",
            "Enable alpha",
            ControlKind::Checkbox,
            ControlValue::Bool(false),
        ));
        binder.bind_bool(
            &mut panel,
            doc,
            keys::ENABLE_ALPHA,
            checkbox,
            &[alpha_slider, alpha_edit],
        );

        panel.add_slider_pair(&mut binder, doc, "Beta", "beta", 0, 256, 32, keys::BETA);
        panel.add_slider_pair(&mut binder, doc, "Gamma", "gamma", 0, 10, 1, keys::GAMMA);

        let text = panel.add(Control::new(
            "text",
            "Text",
            ControlKind::TextEdit,
            ControlValue::Text(String::new()),
        ));
        binder.bind_text(&mut panel, doc, keys::EXAMPLE_STRING, text);

        panel.add(Control::new(
            "run",
            "Run",
            ControlKind::Button,
            ControlValue::Bool(false),
        ));

        (panel, binder)
    }

    /// Handle one input line. Returns true when the surface should close.
    pub fn handle_command(
        &mut self,
        line: &str,
        doc: &mut Value,
        binder: &Binder,
        tx: &Sender<UiEvent>,
    ) -> bool {
        let mut parts = line.split_whitespace();
        match parts.next() {
            None | Some("show") => self.print(),
            Some("toggle") => {
                let name = parts.next().unwrap_or_default();
                self.toggle(name, doc, binder);
            }
            Some("set") => {
                let name = parts.next().unwrap_or_default();
                let value = parts.next().unwrap_or_default();
                self.set_number(name, value, doc, binder);
            }
            Some("text") => {
                let rest: Vec<&str> = parts.collect();
                self.set_text(&rest.join(" "), doc, binder);
            }
            Some("resize") => {
                let w = parts.next().and_then(|s| s.parse().ok());
                let h = parts.next().and_then(|s| s.parse().ok());
                match (w, h) {
                    (Some(w), Some(h)) if w > 0 && h > 0 => {
                        self.width = w;
                        self.height = h;
                        println!("resized to {w}x{h}");
                    }
                    _ => println!("usage: resize <width> <height>"),
                }
            }
            Some("run") => self.start_work(tx),
            Some("quit") | Some("exit") => return true,
            Some("help") => self.print_help(),
            Some(other) => println!("unknown command '{other}' (try 'help')"),
        }
        false
    }

    fn toggle(&mut self, name: &str, doc: &mut Value, binder: &Binder) {
        let Some(id) = self.find(name) else {
            println!("no such control '{name}'");
            return;
        };
        let control = &self.controls[id.0];
        if control.kind != ControlKind::Checkbox {
            println!("'{name}' is not a checkbox");
            return;
        }
        if !control.enabled {
            println!("'{name}' is disabled");
            return;
        }
        let next = !matches!(control.value, ControlValue::Bool(true));
        self.set_control_value(id, ControlValue::Bool(next));
        self.apply(id, ControlValue::Bool(next), doc, binder);
    }

    fn set_number(&mut self, name: &str, raw: &str, doc: &mut Value, binder: &Binder) {
        let Some(id) = self.find(name) else {
            println!("no such control '{name}'");
            return;
        };
        let (min, max) = match self.controls[id.0].kind {
            ControlKind::Slider { min, max, .. } => (min, max),
            ControlKind::NumberEdit { min, max } => (min, max),
            _ => {
                println!("'{name}' is not numeric");
                return;
            }
        };
        if !self.controls[id.0].enabled {
            println!("'{name}' is disabled");
            return;
        }
        let Ok(value) = raw.parse::<i64>() else {
            println!("'{raw}' is not a number");
            return;
        };
        // Control-side normalization: the document sees the clamped value.
        let value = value.clamp(min, max);
        self.set_control_value(id, ControlValue::Int(value));
        self.apply(id, ControlValue::Int(value), doc, binder);
    }

    fn set_text(&mut self, text: &str, doc: &mut Value, binder: &Binder) {
        let Some(id) = self.find("text") else {
            return;
        };
        self.set_control_value(id, ControlValue::Text(text.to_string()));
        self.apply(id, ControlValue::Text(text.to_string()), doc, binder);
    }

    fn apply(&mut self, id: ControlId, value: ControlValue, doc: &mut Value, binder: &Binder) {
        match binder.apply(self, doc, id, value) {
            Ok(Applied::Updated) => {
                if let Some(key) = binder.key_for(id) {
                    println!("{key} = {}", field_display(doc, key));
                }
            }
            Ok(Applied::Unchanged) => {}
            Ok(Applied::Unbound) => println!("control is not bound to a field"),
            Err(err) => println!("edit rejected: {err}"),
        }
    }

    fn start_work(&mut self, tx: &Sender<UiEvent>) {
        if self.working {
            println!("already working");
            return;
        }
        self.working = true;
        println!("Working...");
        worker::spawn(tx.clone(), WORK_DURATION);
    }

    /// Close the transient progress indicator. Only the worker-completion
    /// event reaches here.
    pub fn finish_work(&mut self) {
        if self.working {
            self.working = false;
            info!("background work finished");
            println!("Done.");
        }
    }

    pub fn is_working(&self) -> bool {
        self.working
    }

    pub fn print(&self) {
        println!();
        println!("== hjson-panel ({}x{}) ==", self.width, self.height);
        for control in &self.controls {
            let state = if control.enabled { "" } else { " (disabled)" };
            match &control.kind {
                ControlKind::Checkbox => {
                    let mark = if matches!(control.value, ControlValue::Bool(true)) {
                        "x"
                    } else {
                        " "
                    };
                    println!("[{mark}] {}{state}  ({})", control.label, control.name);
                }
                ControlKind::Slider { min, max, .. } => {
                    let v = int_of(&control.value);
                    println!(
                        "{:<6} {v:>5}  [{min}..{max}]{state}  ({})",
                        control.label, control.name
                    );
                }
                ControlKind::NumberEdit { .. } => {
                    let v = int_of(&control.value);
                    println!("{:<6} {v:>5}  (edit){state}  ({})", control.label, control.name);
                }
                ControlKind::TextEdit => {
                    let t = text_of(&control.value);
                    println!("{}: {t}{state}  ({})", control.label, control.name);
                }
                ControlKind::Button => {
                    println!("<{}>{state}  ({})", control.label, control.name);
                }
            }
        }
        if self.working {
            println!("Working...");
        }
    }

    fn print_help(&self) {
        println!(
            "commands: show | toggle <name> | set <name> <n> | text <s> | \
             resize <w> <h> | run | quit"
        );
    }
}

fn int_of(value: &ControlValue) -> i64 {
    match value {
        ControlValue::Int(v) => *v,
        ControlValue::Bool(b) => i64::from(*b),
        ControlValue::Text(t) => t.parse().unwrap_or(0),
    }
}

fn text_of(value: &ControlValue) -> String {
    match value {
        ControlValue::Text(t) => t.clone(),
        ControlValue::Int(v) => v.to_string(),
        ControlValue::Bool(b) => b.to_string(),
    }
}

fn field_display(doc: &Value, key: &str) -> String {
    doc.get(key).map(|v| v.as_string()).unwrap_or_default()
}
