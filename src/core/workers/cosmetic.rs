//=========================================================================
// Cosmetic Worker
//=========================================================================
//
// Advances a sparkle phase counter for the renderer's decorative effects.
// Never touches gameplay state; its counter has its own lock.
//
//=========================================================================

//=== External Dependencies ===============================================

use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::pace;
use crate::core::sync::TickControl;
use crate::core::Simulation;

//=== Sparkle =============================================================

pub(crate) struct Sparkle {
    phase: Mutex<u32>,
}

impl Sparkle {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(0),
        }
    }

    pub fn advance(&self) -> u32 {
        let mut phase = self.phase.lock();
        *phase = phase.wrapping_add(1);
        *phase
    }

    pub fn phase(&self) -> u32 {
        *self.phase.lock()
    }
}

//=== Worker Loop =========================================================

pub(crate) fn run(sim: &Simulation) {
    pace(sim.facade.stop_signal(), sim.ticks.cosmetic(), || {
        sim.sparkle.advance();
        TickControl::Continue
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
