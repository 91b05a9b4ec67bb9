//=========================================================================
// Worker Supervisor
//=========================================================================
//
// Owns the join handles of every spawned worker.
//
// Architecture:
//   spawn()  → named thread → catch_unwind(kind.run) → exit report
//                                                         ↓
//   join_within(grace) ← crossbeam channel of WorkerExit ─┘
//
// A worker's permit (if any) is dropped inside `kind.run`, before its
// exit report is sent, so once every report is in, every permit is back.
// Workers that miss the grace period are detached and listed in the
// returned `ShutdownReport`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::WorkerKind;
use crate::core::Simulation;
use crate::error::EngineError;

//=== ShutdownReport ======================================================

/// Outcome of waiting for workers after a stop request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShutdownReport {
    /// Workers that exited and were joined.
    pub joined: usize,
    /// Workers still running when the grace period ran out.
    pub timed_out: Vec<String>,
    /// Workers whose loop panicked at some point.
    pub faulted: usize,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.timed_out.is_empty() && self.faulted == 0
    }
}

//=== WorkerExit ==========================================================

struct WorkerExit {
    name: String,
    faulted: bool,
}

//=== WorkerSet ===========================================================

pub(crate) struct WorkerSet {
    handles: Vec<(String, JoinHandle<()>)>,
    exit_tx: Sender<WorkerExit>,
    exit_rx: Receiver<WorkerExit>,
    alive: Arc<AtomicUsize>,
}

impl WorkerSet {
    pub fn new() -> Self {
        let (exit_tx, exit_rx) = unbounded();
        Self {
            handles: Vec::new(),
            exit_tx,
            exit_rx,
            alive: Arc::new(AtomicUsize::new(0)),
        }
    }

    //--- Spawning ---------------------------------------------------------

    pub fn spawn(&mut self, kind: WorkerKind, sim: &Arc<Simulation>) -> Result<(), EngineError> {
        self.spawn_with(kind.thread_name(), sim, move |sim| kind.run(sim))
    }

    /// Spawns `body` as a supervised worker named `name`.
    fn spawn_with<F>(&mut self, name: String, sim: &Arc<Simulation>, body: F) -> Result<(), EngineError>
    where
        F: FnOnce(&Simulation) + Send + 'static,
    {
        let sim = Arc::clone(sim);
        let alive = Arc::clone(&self.alive);
        let exits = self.exit_tx.clone();

        alive.fetch_add(1, Ordering::AcqRel);
        let thread_alive = Arc::clone(&alive);
        let thread_name = name.clone();

        let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&sim)));

            let faulted = match outcome {
                Ok(()) => false,
                Err(payload) => {
                    error!("Worker {} faulted: {}", thread_name, panic_message(&*payload));
                    true
                }
            };

            thread_alive.fetch_sub(1, Ordering::AcqRel);
            let _ = exits.send(WorkerExit {
                name: thread_name,
                faulted,
            });
        });

        match spawned {
            Ok(handle) => {
                debug!("Spawned worker {}", name);
                self.handles.push((name, handle));
                Ok(())
            }
            Err(source) => {
                alive.fetch_sub(1, Ordering::AcqRel);
                error!("Failed to spawn worker {}: {}", name, source);
                Err(EngineError::WorkerSpawn { name, source })
            }
        }
    }

    //--- Telemetry --------------------------------------------------------

    /// Workers whose loop has not returned yet.
    pub fn alive(&self) -> usize {
        self.alive.load(Ordering::Acquire)
    }

    pub fn spawned(&self) -> usize {
        self.handles.len()
    }

    //--- Shutdown ---------------------------------------------------------

    /// Waits up to `grace` for every worker to report its exit, then joins
    /// those that did and detaches the rest.
    pub fn join_within(&mut self, grace: Duration) -> ShutdownReport {
        let deadline = Instant::now() + grace;
        let handles = std::mem::take(&mut self.handles);

        let mut exited = HashSet::with_capacity(handles.len());
        let mut faulted = 0;
        while exited.len() < handles.len() {
            match self.exit_rx.recv_deadline(deadline) {
                Ok(exit) => {
                    if exit.faulted {
                        faulted += 1;
                    }
                    exited.insert(exit.name);
                }
                Err(_) => break,
            }
        }

        let mut report = ShutdownReport {
            faulted,
            ..ShutdownReport::default()
        };

        for (name, handle) in handles {
            if exited.contains(&name) {
                if handle.join().is_err() {
                    error!("Worker {} panicked outside its guard", name);
                }
                report.joined += 1;
            } else {
                warn!("Worker {} did not stop within {:?}, detaching", name, grace);
                report.timed_out.push(name);
            }
        }

        report
    }
}

//=== Helpers =============================================================

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
