//! Interactive surface: event queue, terminal panel, background worker.
//!
//! The event loop owns the document, the panel and the binder; nothing else
//! touches them. Input lines and worker completions arrive as [`UiEvent`]s
//! over one mpsc channel, so the loop is the single place where interactive
//! state changes.

pub mod panel;
pub mod worker;

use std::io::BufRead;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::binding::Binder;
use crate::value::Value;

pub use panel::Panel;

/// Messages delivered to the owning thread's event queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// One line of user input.
    Command(String),
    /// The background worker finished. At most one per `run` command.
    WorkFinished,
    /// Close the surface.
    Quit,
}

/// Pump stdin lines into the event queue from a detached reader thread.
/// Sends [`UiEvent::Quit`] on end of input.
pub fn pump_stdin(tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(UiEvent::Command(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "stdin read failed");
                    break;
                }
            }
        }
        let _ = tx.send(UiEvent::Quit);
    });
}

/// Feed a prepared command list (script mode), then quit.
pub fn pump_script(tx: Sender<UiEvent>, lines: Vec<String>) {
    thread::spawn(move || {
        for line in lines {
            if tx.send(UiEvent::Command(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(UiEvent::Quit);
    });
}

/// Run the event loop until quit. Returns when the surface closes.
pub fn run(
    doc: &mut Value,
    panel: &mut Panel,
    binder: &Binder,
    rx: &Receiver<UiEvent>,
    tx: &Sender<UiEvent>,
) {
    panel.print();
    while let Ok(event) = rx.recv() {
        debug!(?event, "ui event");
        match event {
            UiEvent::Command(line) => {
                if panel.handle_command(&line, doc, binder, tx) {
                    break;
                }
            }
            UiEvent::WorkFinished => panel.finish_work(),
            UiEvent::Quit => break,
        }
    }
}
