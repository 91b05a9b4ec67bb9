//=========================================================================
// Physics Worker
//=========================================================================
//
// Integrates the actor once per physics tick.
//
// Step:
//   gravity (airborne only) → integrate → clamp x → land on surface
//   → fell below the world? register a hit
//
// Touches only actor kinematics and immutable surfaces, so the only lock
// it ever takes is the vitals lock inside `register_hit()`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::pace;
use crate::config::PhysicsConfig;
use crate::core::sync::TickControl;
use crate::core::world::{Kinematics, Surface};
use crate::core::Simulation;
use crate::engine::event::HitCause;

//=== StepOutcome =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Airborne,
    Grounded,
    FellOut,
}

//=== Integration =========================================================

/// Advances `k` by one tick inside a `width × height` world.
pub fn step(
    k: &mut Kinematics,
    surfaces: &[Surface],
    width: f32,
    height: f32,
    physics: &PhysicsConfig,
) -> StepOutcome {
    if !k.grounded {
        k.vy += physics.gravity;
    }

    k.x += k.vx;
    k.y += k.vy;
    k.x = k.x.clamp(0.0, (width - k.w).max(0.0));

    k.grounded = false;
    if k.vy >= 0.0 {
        let feet = k.y + k.h;
        let landing = surfaces.iter().find(|s| {
            k.x + k.w > s.x
                && k.x < s.right()
                && feet >= s.y
                && feet <= s.y + physics.landing_tolerance
        });

        if let Some(surface) = landing {
            k.y = surface.y - k.h;
            k.vy = 0.0;
            k.grounded = true;
        }
    }

    if k.y > height {
        StepOutcome::FellOut
    } else if k.grounded {
        StepOutcome::Grounded
    } else {
        StepOutcome::Airborne
    }
}

//=== Worker Loop =========================================================

pub(crate) fn run(sim: &Simulation) {
    let facade = &sim.facade;
    let world = facade.world();

    pace(facade.stop_signal(), sim.ticks.physics(), || {
        let mut k = world.actor.kinematics();
        let outcome = step(&mut k, &world.surfaces, world.width, world.height, &sim.physics);
        if !world.actor.apply(&k) {
            debug!("Actor respawned mid-step, dropping step");
            return TickControl::Continue;
        }

        if outcome == StepOutcome::FellOut {
            debug!("Actor fell out of the world at y={}", k.y);
            let hit = facade.register_hit();
            sim.report_hit(hit, HitCause::Fall);
        }
        TickControl::Continue
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
