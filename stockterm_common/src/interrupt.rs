//! Operator interrupt shared between the Ctrl+C handler and long-running loops.
//!
//! The signal is a bounded channel of capacity one: the first trigger is queued for
//! whichever loop is waiting, and a second trigger before that one is consumed is
//! reported back to the caller so it can force an exit.
use crossbeam_channel::{Receiver, Sender, bounded};

/// Cloneable interrupt signal.
#[derive(Debug, Clone)]
pub struct Interrupt {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl Interrupt {
    /// New, untriggered signal.
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }

    /// Raises the signal. Returns `false` when a previous trigger is still pending.
    pub fn trigger(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }

    /// Receiver to use in `select!`. It never disconnects while `self` is alive.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}
