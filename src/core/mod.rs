//=========================================================================
// Simulation Core
//
// Shared context for every background worker of the simulation.
//
// Responsibilities:
// - Hold the synchronization facade (world + lock partitions)
// - Hold the obstacle admission semaphore and the event feed
// - Carry the immutable tuning every worker reads each tick
//
// Notes:
// One `Simulation` is built per engine and shared behind an `Arc`.
// Workers never own state of their own beyond what is listed in
// `world::entities`; the context is the only thing they capture.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Module Declarations =================================================

pub mod snapshot;
pub mod sync;
pub mod world;
pub(crate) mod workers;

//=== Internal Dependencies ===============================================

use crate::config::{EngineConfig, PhysicsConfig, TickIntervals};
use crate::engine::event::{EngineEvent, EventSink, HitCause};
use sync::{HitOutcome, Semaphore, SyncFacade};
use workers::Sparkle;
use world::WorldState;

//=== Simulation ==========================================================

pub(crate) struct Simulation {
    pub facade: SyncFacade,
    pub permits: Semaphore,
    pub sparkle: Sparkle,
    pub events: EventSink,
    pub physics: PhysicsConfig,
    pub ticks: TickIntervals,
    pub points_per_collectible: u64,
}

impl Simulation {
    pub fn new(config: &EngineConfig, events: EventSink) -> Self {
        let world = WorldState::from_config(config);
        Self {
            facade: SyncFacade::new(world, config.actor.initial_lives),
            permits: Semaphore::new(config.actor_pool_limit),
            sparkle: Sparkle::new(),
            events,
            physics: config.physics,
            ticks: config.ticks,
            points_per_collectible: config.points_per_collectible,
        }
    }

    /// Publishes the events that follow a hit registration.
    pub fn report_hit(&self, outcome: HitOutcome, cause: HitCause) {
        if !outcome.registered {
            return;
        }

        info!(
            "Life lost ({:?}), {} remaining",
            cause, outcome.lives_remaining
        );
        self.events.publish(EngineEvent::LifeLost {
            lives_remaining: outcome.lives_remaining,
            cause,
        });

        if outcome.ended_game() {
            let score = self.facade.score();
            self.events.publish(EngineEvent::GameOver { score });
        }
    }
}
