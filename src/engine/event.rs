//=========================================================================
// Engine Events
//
// Notifications published by workers for an external observer
// (dashboard, logger, test harness).
//
// Responsibilities:
// - Describe gameplay-relevant transitions (pickups, lost lives, game over)
// - Deliver them without ever blocking a worker
//
// Notes:
// The feed is a bounded crossbeam channel. The engine holds a receiver
// of its own, so the feed stays connected even when nobody reads it.
// When it is full the newest event is dropped (logged at debug level);
// simulation state is unaffected.
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::debug;

//=== HitCause ============================================================

/// Why a life was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCause {
    /// Overlap with the obstacle of this id.
    Obstacle(usize),
    /// The actor fell below the world.
    Fall,
}

//=== EngineEvent =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Started { workers: usize },
    CollectiblePicked { id: usize, score: u64 },
    LifeLost { lives_remaining: u32, cause: HitCause },
    GameOver { score: u64 },
    Stopped { timed_out: usize },
}

//=== EventSink ===========================================================

/// Non-blocking publisher side of the event feed.
#[derive(Clone)]
pub(crate) struct EventSink {
    sender: Sender<EngineEvent>,
}

impl EventSink {
    /// Creates the feed and returns both ends.
    pub(crate) fn channel(capacity: usize) -> (Self, Receiver<EngineEvent>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, receiver)
    }

    pub(crate) fn publish(&self, event: EngineEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!("Event feed full, dropping {:?}", event);
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
