//! One-shot background worker.
//!
//! Simulates heavy work without blocking the event loop. The worker holds
//! no reference to the document; its only output is a single
//! [`UiEvent::WorkFinished`] notification back to the owning thread, which
//! closes the transient progress indicator. Fire-and-forget: no
//! cancellation, no timeout, no progress reporting.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::UiEvent;

/// Spawn the worker. The send result is ignored: if the event loop is gone,
/// there is nobody left to notify.
pub fn spawn(tx: Sender<UiEvent>, work: Duration) {
    thread::spawn(move || {
        debug!(?work, "worker started");
        thread::sleep(work);
        let _ = tx.send(UiEvent::WorkFinished);
    });
}
