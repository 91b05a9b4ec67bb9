//=========================================================================
// Stop Signal
//=========================================================================
//
// One-shot cooperative cancellation shared by every worker.
//
// Architecture:
//   StopSignal
//     ├─ trigger: Mutex<Option<Sender<()>>>  → dropped once on trigger()
//     ├─ listener: Receiver<()>              → disconnects for all waiters
//     └─ stopped: AtomicBool                 → cheap poll for tick loops
//
// Workers never sleep directly: `wait(interval)` blocks on the listener
// with a timeout, so a trigger wakes every sleeping worker at once.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== StopSignal ==========================================================

pub struct StopSignal {
    stopped: AtomicBool,
    trigger: Mutex<Option<Sender<()>>>,
    listener: Receiver<()>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self {
            stopped: AtomicBool::new(false),
            trigger: Mutex::new(Some(tx)),
            listener: rx,
        }
    }

    /// Fires the signal. Returns true only for the call that fired it.
    pub fn trigger(&self) -> bool {
        let sender = self.trigger.lock().take();
        match sender {
            Some(sender) => {
                self.stopped.store(true, Ordering::Release);
                drop(sender);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Receiver that disconnects when the signal fires, for `select!`.
    pub fn listener(&self) -> &Receiver<()> {
        &self.listener
    }

    /// Waits out one tick interval, returning early if the signal fires.
    pub(crate) fn wait(&self, interval: Duration) -> TickControl {
        if self.is_triggered() {
            return TickControl::Exit;
        }
        match self.listener.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => TickControl::Continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => TickControl::Exit,
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
