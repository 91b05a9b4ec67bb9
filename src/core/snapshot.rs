//=========================================================================
// Snapshot
//=========================================================================
//
// Immutable point-in-time copy of the world for an external renderer.
//
// Score, lives, phase and the visibility of obstacles/collectibles are
// copied inside one critical section, so they always agree with each
// other. Positions come from relaxed cells and may lag by a tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::Serialize;

//=== Internal Dependencies ===============================================

use super::world::{Phase, Rect};

//=== ActorView ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActorView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub lives: u32,
}

//=== Telemetry ===========================================================

/// Counters sampled outside the facade locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Telemetry {
    pub active_workers: usize,
    pub permits_in_use: usize,
    pub sparkle_phase: u32,
}

//=== Snapshot ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub actor: ActorView,
    pub surfaces: Vec<Rect>,
    /// Active obstacles only.
    pub obstacles: Vec<Rect>,
    /// Uncollected collectibles only.
    pub collectibles: Vec<Rect>,
    pub score: u64,
    pub active_worker_count: usize,
    pub permits_in_use: usize,
    pub sparkle_phase: u32,
    pub phase: Phase,
}

impl Snapshot {
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }
}
