//=========================================================================
// Synchronization Facade
//=========================================================================
//
// Owns the world and the two locks that guard its invariant-bearing
// fields. Every mutation of score, lives, phase, `active` or `collected`
// goes through here.
//
// Lock partitions:
//   score  → { score, collected[] }
//   vitals → { lives, phase, obstacle `active` }
//
// A non-final hit respawns the actor while holding vitals. The respawn
// itself serializes with physics write-back on the actor's own guard
// (vitals, then guard); motion fields stay relaxed otherwise.
//
// Lock order: score before vitals, and only `snapshot()` takes both.
// No lock is held across logging, channel sends or sleeps.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, warn};
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::stop_signal::StopSignal;
use crate::core::snapshot::{ActorView, Snapshot, Telemetry};
use crate::core::world::{Phase, WorldState};

//=== Partitions ==========================================================

struct ScoreBoard {
    score: u64,
    collected: Vec<bool>,
}

struct Vitals {
    lives: u32,
    phase: Phase,
    launched: bool,
}

//=== HitOutcome ==========================================================

/// Result of a hit registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub lives_remaining: u32,
    pub is_over: bool,
    /// False when the hit was ignored (not running, already over,
    /// obstacle already inactive).
    pub registered: bool,
}

impl HitOutcome {
    /// True only for the hit that moved the engine into `Over`.
    pub fn ended_game(&self) -> bool {
        self.registered && self.is_over
    }
}

//=== SyncFacade ==========================================================

pub struct SyncFacade {
    world: WorldState,
    stop: StopSignal,
    score: Mutex<ScoreBoard>,
    vitals: Mutex<Vitals>,
}

impl SyncFacade {
    pub fn new(world: WorldState, initial_lives: u32) -> Self {
        let collected = vec![false; world.collectibles.len()];
        Self {
            world,
            stop: StopSignal::new(),
            score: Mutex::new(ScoreBoard {
                score: 0,
                collected,
            }),
            vitals: Mutex::new(Vitals {
                lives: initial_lives,
                phase: Phase::Idle,
                launched: false,
            }),
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    //--- Lifecycle --------------------------------------------------------

    /// `Idle → Running`. Fails with the current phase if the engine is not
    /// idle or has already run once.
    pub fn begin(&self) -> Result<(), Phase> {
        let mut vitals = self.vitals.lock();
        if vitals.launched || vitals.phase != Phase::Idle {
            return Err(vitals.phase);
        }
        vitals.launched = true;
        vitals.phase = Phase::Running;
        Ok(())
    }

    /// `Running → Idle` and fires the stop signal. `Over` is left as is.
    pub fn halt(&self) -> Phase {
        let (phase, launched) = {
            let mut vitals = self.vitals.lock();
            if vitals.phase == Phase::Running {
                vitals.phase = Phase::Idle;
            }
            (vitals.phase, vitals.launched)
        };

        if launched {
            self.stop.trigger();
        }
        phase
    }

    pub fn phase(&self) -> Phase {
        self.vitals.lock().phase
    }

    //--- Score Partition --------------------------------------------------

    /// Adds `points` and returns the new total.
    pub fn add_score(&self, points: u64) -> u64 {
        let mut board = self.score.lock();
        board.score = board.score.saturating_add(points);
        board.score
    }

    /// Marks collectible `id` as collected.
    ///
    /// Returns true only for the call that performed the transition.
    /// Late calls after the stop signal fired are ignored.
    pub fn collect(&self, id: usize) -> bool {
        if self.stop.is_triggered() {
            return false;
        }

        let known = {
            let mut board = self.score.lock();
            match board.collected.get_mut(id) {
                Some(flag) if !*flag => {
                    *flag = true;
                    return true;
                }
                Some(_) => true,
                None => false,
            }
        };

        if !known {
            warn!("Ignoring collect for unknown collectible {}", id);
        }
        false
    }

    pub fn score(&self) -> u64 {
        self.score.lock().score
    }

    //--- Vitals Partition -------------------------------------------------

    /// Removes one life.
    ///
    /// At zero lives the phase becomes `Over` and the stop signal fires;
    /// otherwise the actor respawns. A no-op unless `Running`.
    pub fn register_hit(&self) -> HitOutcome {
        let outcome = {
            let mut vitals = self.vitals.lock();
            self.apply_hit(&mut vitals)
        };
        self.after_hit(outcome)
    }

    /// Deactivates obstacle `id` and registers the hit in one critical
    /// section. Ignored if the obstacle was already inactive.
    pub fn strike_obstacle(&self, id: usize) -> HitOutcome {
        let Some(obstacle) = self.world.obstacle(id) else {
            warn!("Ignoring strike for unknown obstacle {}", id);
            return self.ignored_hit();
        };

        let outcome = {
            let mut vitals = self.vitals.lock();
            if vitals.phase != Phase::Running || !obstacle.deactivate() {
                Self::unregistered(&vitals)
            } else {
                self.apply_hit(&mut vitals)
            }
        };
        self.after_hit(outcome)
    }

    pub fn lives(&self) -> u32 {
        self.vitals.lock().lives
    }

    fn apply_hit(&self, vitals: &mut Vitals) -> HitOutcome {
        if vitals.phase != Phase::Running || vitals.lives == 0 {
            return Self::unregistered(vitals);
        }

        vitals.lives -= 1;
        if vitals.lives == 0 {
            vitals.phase = Phase::Over;
        } else {
            self.world.actor.respawn(self.world.spawn);
        }

        HitOutcome {
            lives_remaining: vitals.lives,
            is_over: vitals.phase == Phase::Over,
            registered: true,
        }
    }

    fn after_hit(&self, outcome: HitOutcome) -> HitOutcome {
        if outcome.ended_game() {
            info!("Game over");
            self.stop.trigger();
        }
        outcome
    }

    fn ignored_hit(&self) -> HitOutcome {
        Self::unregistered(&self.vitals.lock())
    }

    fn unregistered(vitals: &Vitals) -> HitOutcome {
        HitOutcome {
            lives_remaining: vitals.lives,
            is_over: vitals.phase == Phase::Over,
            registered: false,
        }
    }

    //--- Snapshot ---------------------------------------------------------

    /// Copies the world under both locks (score, then vitals).
    pub fn snapshot(&self, telemetry: Telemetry) -> Snapshot {
        let world = &self.world;

        let (score, lives, phase, obstacles, collectibles) = {
            let board = self.score.lock();
            let vitals = self.vitals.lock();

            let obstacles = world
                .obstacles
                .iter()
                .filter(|o| o.is_active())
                .map(|o| o.bounds())
                .collect();

            let collectibles = world
                .collectibles
                .iter()
                .filter(|c| !board.collected[c.id])
                .map(|c| c.bounds)
                .collect();

            (board.score, vitals.lives, vitals.phase, obstacles, collectibles)
        };

        let actor = world.actor.bounds();

        Snapshot {
            actor: ActorView {
                x: actor.x,
                y: actor.y,
                w: actor.w,
                h: actor.h,
                lives,
            },
            surfaces: world.surfaces.clone(),
            obstacles,
            collectibles,
            score,
            active_worker_count: telemetry.active_workers,
            permits_in_use: telemetry.permits_in_use,
            sparkle_phase: telemetry.sparkle_phase,
            phase,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
