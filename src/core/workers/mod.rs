//=========================================================================
// Workers
//=========================================================================
//
// Background tasks of the simulation and the supervisor that owns them.
//
// Architecture:
//   WorkerSet (supervisor)
//     ├─ physics           1 thread, ticks actor kinematics
//     ├─ obstacle-{id}     1 thread per obstacle, gated by the semaphore
//     ├─ interaction       1 thread, overlap scan
//     └─ cosmetic          1 thread, sparkle counter
//
// Every loop is paced by `pace()`, which waits on the stop signal
// instead of sleeping so cancellation is immediate.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== Module Declarations =================================================

pub(crate) mod actor_pool;
pub(crate) mod cosmetic;
pub(crate) mod interaction;
pub(crate) mod physics;
mod supervisor;

//=== Internal API ========================================================

pub(crate) use cosmetic::Sparkle;
pub use supervisor::ShutdownReport;
pub(crate) use supervisor::WorkerSet;

use super::sync::{StopSignal, TickControl};
use super::Simulation;

//=== WorkerKind ==========================================================

/// Identifies a worker and selects its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerKind {
    Physics,
    Obstacle(usize),
    Interaction,
    Cosmetic,
}

impl WorkerKind {
    /// Thread name; unique within one engine.
    pub fn thread_name(&self) -> String {
        match self {
            WorkerKind::Physics => "physics".to_string(),
            WorkerKind::Obstacle(id) => format!("obstacle-{}", id),
            WorkerKind::Interaction => "interaction".to_string(),
            WorkerKind::Cosmetic => "cosmetic".to_string(),
        }
    }

    pub fn run(self, sim: &Simulation) {
        match self {
            WorkerKind::Physics => physics::run(sim),
            WorkerKind::Obstacle(id) => actor_pool::run(sim, id),
            WorkerKind::Interaction => interaction::run(sim),
            WorkerKind::Cosmetic => cosmetic::run(sim),
        }
    }
}

//=== pace() ==============================================================
//
// Fixed-interval loop: run `tick`, then wait out the rest of the interval
// on the stop signal. Exits when either side says so.
//
pub(crate) fn pace<F>(stop: &StopSignal, interval: Duration, mut tick: F)
where
    F: FnMut() -> TickControl,
{
    while !stop.is_triggered() {
        let frame_start = Instant::now();

        if tick() == TickControl::Exit {
            break;
        }

        let remaining = interval.saturating_sub(frame_start.elapsed());
        if stop.wait(remaining) == TickControl::Exit {
            break;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
