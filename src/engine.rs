//=========================================================================
// Aetheric Platformer Engine
//
// Main entry point and lifecycle coordinator.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──start()──>  [Workers]
//         │                          │                      │
//         ├─ with_config()           ├─ snapshot()          ├─ physics
//         ├─ with_pool_limit()       ├─ move_actor()/jump() ├─ obstacle-{id}
//         └─ with_layout()           └─ stop()              ├─ interaction
//                                                           └─ cosmetic
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event;

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::config::{EngineConfig, LevelLayout, TickIntervals};
use crate::core::snapshot::{Snapshot, Telemetry};
use crate::core::workers::{ShutdownReport, WorkerKind, WorkerSet};
use crate::core::world::{Direction, Phase};
use crate::core::Simulation;
use crate::error::EngineError;
use event::{EngineEvent, EventSink};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// Starts from [`EngineConfig::default()`], the reference level, and
/// applies overrides in call order. Validation happens in [`build`].
///
/// # Examples
///
/// ```
/// use aetheric_platformer::EngineBuilder;
///
/// let engine = EngineBuilder::new()
///     .with_pool_limit(3)
///     .with_initial_lives(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.snapshot().actor.lives, 5);
/// ```
///
/// [`build`]: EngineBuilder::build
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a builder with the reference configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the maximum number of concurrently patrolling obstacles.
    pub fn with_pool_limit(mut self, limit: usize) -> Self {
        self.config.actor_pool_limit = limit;
        self
    }

    pub fn with_layout(mut self, layout: LevelLayout) -> Self {
        self.config.level = layout;
        self
    }

    pub fn with_initial_lives(mut self, lives: u32) -> Self {
        self.config.actor.initial_lives = lives;
        self
    }

    pub fn with_ticks(mut self, ticks: TickIntervals) -> Self {
        self.config.ticks = ticks;
        self
    }

    /// Sets how long `stop()` waits for workers before detaching them.
    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.config.grace_period_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    /// Validates the configuration and lays out the level.
    pub fn build(self) -> Result<Engine, EngineError> {
        Engine::new(self.config)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// The simulation runtime.
///
/// Owns the shared simulation context and the handles of its workers.
/// An engine runs at most once: after `stop()` or game over, build a new
/// one to play again.
///
/// # Lifecycle
///
/// ```text
/// Idle ──start()──> Running ──lives == 0──> Over
///                      │
///                      └──stop()──> Idle
/// ```
pub struct Engine {
    sim: Arc<Simulation>,
    workers: WorkerSet,
    events: Receiver<EngineEvent>,
    grace: Duration,
    last_shutdown: Option<ShutdownReport>,
}

impl Engine {
    //--- Construction -----------------------------------------------------

    /// Validates `config` and builds an idle engine around its level.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let (sink, events) = EventSink::channel(config.event_capacity);
        let sim = Arc::new(Simulation::new(&config, sink));

        info!(
            "Building engine ({}x{}, {} obstacles, pool limit {})",
            config.world.width,
            config.world.height,
            config.level.obstacles.len(),
            config.actor_pool_limit
        );

        Ok(Self {
            sim,
            workers: WorkerSet::new(),
            events,
            grace: config.grace_period(),
            last_shutdown: None,
        })
    }

    //--- Lifecycle --------------------------------------------------------

    /// Spawns every worker and enters `Running`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidTransition`] if the engine is running or has
    /// already run; [`EngineError::WorkerSpawn`] if the OS refuses a
    /// thread, in which case the workers spawned so far are stopped.
    pub fn start(&mut self) -> Result<(), EngineError> {
        self.sim
            .facade
            .begin()
            .map_err(|from| EngineError::InvalidTransition {
                from,
                action: "start",
            })?;

        let obstacles = self.sim.facade.world().obstacles.len();
        let kinds = std::iter::once(WorkerKind::Physics)
            .chain((0..obstacles).map(WorkerKind::Obstacle))
            .chain([WorkerKind::Interaction, WorkerKind::Cosmetic]);

        for kind in kinds {
            if let Err(err) = self.workers.spawn(kind, &self.sim) {
                self.stop();
                return Err(err);
            }
        }

        let workers = self.workers.spawned();
        info!("Engine started with {} workers", workers);
        self.sim.events.publish(EngineEvent::Started { workers });
        Ok(())
    }

    /// Signals every worker to stop and waits up to the grace period.
    ///
    /// Leaves a running engine `Idle` (an `Over` engine stays `Over`).
    /// Returns once every worker has exited and released its permit, or
    /// when the grace period runs out; stragglers are listed in the
    /// report. Calling it again is a no-op.
    pub fn stop(&mut self) -> ShutdownReport {
        let phase = self.sim.facade.halt();

        if self.workers.spawned() == 0 {
            return ShutdownReport::default();
        }

        let report = self.workers.join_within(self.grace);
        if report.timed_out.is_empty() {
            info!("Engine stopped ({:?}), {} workers joined", phase, report.joined);
        } else {
            warn!(
                "Engine stopped ({:?}) with {} workers still running: {:?}",
                phase,
                report.timed_out.len(),
                report.timed_out
            );
        }

        self.sim.events.publish(EngineEvent::Stopped {
            timed_out: report.timed_out.len(),
        });
        self.last_shutdown = Some(report.clone());
        report
    }

    //--- Queries ----------------------------------------------------------

    /// Consistent point-in-time copy of the world. Never waits on workers.
    pub fn snapshot(&self) -> Snapshot {
        self.sim.facade.snapshot(Telemetry {
            active_workers: self.workers.alive(),
            permits_in_use: self.sim.permits.in_use(),
            sparkle_phase: self.sim.sparkle.phase(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.sim.facade.phase()
    }

    /// Receiver for engine events. Clones share one queue.
    ///
    /// The feed holds `event_capacity` undrained events; later ones are
    /// dropped until a reader catches up. Reading is optional.
    pub fn events(&self) -> Receiver<EngineEvent> {
        self.events.clone()
    }

    /// Highest number of obstacle workers ever patrolling at once.
    pub fn peak_permits(&self) -> usize {
        self.sim.permits.peak()
    }

    pub fn last_shutdown(&self) -> Option<&ShutdownReport> {
        self.last_shutdown.as_ref()
    }

    //--- Control Input ----------------------------------------------------
    //
    // Direct relaxed writes to actor velocity. No lock, no ordering with
    // the physics tick; last writer wins.
    //

    /// Sets horizontal velocity, scaled by air control while airborne.
    pub fn move_actor(&self, direction: Direction) {
        let actor = &self.sim.facade.world().actor;
        let physics = &self.sim.physics;

        let mut speed = physics.horizontal_speed;
        if !actor.is_grounded() {
            speed *= physics.air_control;
        }
        actor.set_horizontal_velocity(speed * direction.sign());
    }

    pub fn stop_actor_move(&self) {
        self.sim.facade.world().actor.set_horizontal_velocity(0.0);
    }

    /// Jumps if grounded. Returns whether the jump was applied.
    pub fn jump(&self) -> bool {
        self.sim
            .facade
            .world()
            .actor
            .launch(self.sim.physics.jump_impulse)
    }

    /// Moves and jumps in one call.
    pub fn move_and_jump(&self, direction: Direction) -> bool {
        self.move_actor(direction);
        self.jump()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
