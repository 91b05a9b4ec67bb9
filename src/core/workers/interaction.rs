//=========================================================================
// Interaction Worker
//=========================================================================
//
// Periodic overlap scan between the actor and everything it can touch.
//
//   actor ∩ active obstacle    → strike_obstacle(id)  (deactivate + hit)
//   actor ∩ collectible        → collect(id) → add_score(points)
//
// Sole caller of `strike_obstacle`, `collect` and `add_score`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::pace;
use crate::core::sync::TickControl;
use crate::core::Simulation;
use crate::engine::event::{EngineEvent, HitCause};

//=== Scan ================================================================

/// Runs one overlap pass. Returns `Exit` once the game is over.
pub(crate) fn scan(sim: &Simulation) -> TickControl {
    let facade = &sim.facade;
    let world = facade.world();
    let mut actor = world.actor.bounds();

    for obstacle in &world.obstacles {
        if !obstacle.is_active() || !actor.overlaps(&obstacle.bounds()) {
            continue;
        }

        let hit = facade.strike_obstacle(obstacle.id());
        sim.report_hit(hit, HitCause::Obstacle(obstacle.id()));
        if hit.is_over {
            return TickControl::Exit;
        }
        if hit.registered {
            actor = world.actor.bounds();
        }
    }

    for collectible in &world.collectibles {
        if actor.overlaps(&collectible.bounds) && facade.collect(collectible.id) {
            let score = facade.add_score(sim.points_per_collectible);
            debug!(
                "Collected {} (+{}), score {}",
                collectible.id, sim.points_per_collectible, score
            );
            sim.events.publish(EngineEvent::CollectiblePicked {
                id: collectible.id,
                score,
            });
        }
    }

    TickControl::Continue
}

//=== Worker Loop =========================================================

pub(crate) fn run(sim: &Simulation) {
    pace(sim.facade.stop_signal(), sim.ticks.interaction(), || scan(sim));
}

//=========================================================================
// Unit Tests
//=========================================================================
