//=========================================================================
// Actor Pool
//=========================================================================
//
// One worker per obstacle, admission-controlled by the pool semaphore.
//
// Lifecycle of a pool worker:
//   acquire permit (blocks; cancelled by stop) → patrol loop → drop permit
//
// The loop runs while the engine is running and the obstacle is active.
// A worker reads and writes only its own obstacle's `x`/heading.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::pace;
use crate::core::sync::TickControl;
use crate::core::world::{Direction, Patrol, Surface};
use crate::core::Simulation;

//=== Patrol Step =========================================================

/// Moves `patrol` one step and turns it around when its leading edge
/// leaves every surface or the body reaches a world edge.
///
/// Returns true if the heading was reversed.
pub fn advance(patrol: &mut Patrol, surfaces: &[Surface], world_width: f32, tolerance: f32) -> bool {
    let body = &mut patrol.bounds;
    body.x += patrol.speed * patrol.direction.sign();

    let lead = match patrol.direction {
        Direction::Right => body.right(),
        Direction::Left => body.x,
    };
    let feet = body.bottom();

    let supported = surfaces
        .iter()
        .any(|s| (feet - s.y).abs() <= tolerance && lead > s.x && lead < s.right());
    let at_edge = body.x <= 0.0 || body.x >= world_width - body.w;

    if !supported || at_edge {
        patrol.direction = patrol.direction.reversed();
        true
    } else {
        false
    }
}

//=== Worker Loop =========================================================

pub(crate) fn run(sim: &Simulation, id: usize) {
    let facade = &sim.facade;
    let world = facade.world();
    let stop = facade.stop_signal();

    let Some(obstacle) = world.obstacle(id) else {
        warn!("Pool worker started for unknown obstacle {}", id);
        return;
    };

    let Some(_permit) = sim.permits.acquire(stop) else {
        debug!("Obstacle {} cancelled before admission", id);
        return;
    };
    debug!(
        "Obstacle {} admitted ({}/{} permits)",
        id,
        sim.permits.in_use(),
        sim.permits.limit()
    );

    pace(stop, sim.ticks.obstacle(), || {
        if !obstacle.is_active() {
            return TickControl::Exit;
        }

        let mut patrol = obstacle.patrol();
        advance(&mut patrol, &world.surfaces, world.width, sim.physics.patrol_tolerance);
        obstacle.apply(&patrol);
        TickControl::Continue
    });

    debug!("Obstacle {} releasing permit", id);
}

//=========================================================================
// Unit Tests
//=========================================================================
