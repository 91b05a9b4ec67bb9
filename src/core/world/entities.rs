//=========================================================================
// World Entities
//=========================================================================
//
// Value types for everything that lives in the world.
//
// Ownership of mutable fields:
//   Actor     position/velocity/grounded  → PhysicsWorker (relaxed)
//             vx/vy from control input    → external caller (relaxed)
//             reset to spawn              → SyncFacade, under lives lock
//                                           and the actor's respawn guard
//   Obstacle  x/direction                 → its own ActorPool worker
//             active                      → SyncFacade, under lives lock
//   Surface   immutable after level init
//   Collectible geometry immutable; `collected` lives under the score lock
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::atomic::AtomicF32;

//=== Rect ================================================================

/// Axis-aligned bounding box, origin at the top-left corner, y grows down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB intersection; touching edges do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Static platform geometry.
pub type Surface = Rect;

//=== Direction ===========================================================

/// Horizontal heading, shared by control input and obstacle patrols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

//=== Phase ===============================================================

/// Engine lifecycle phase.
///
/// `Idle → Running` on start, `Running → Over` when lives reach zero,
/// `Running → Idle` on stop. An engine never re-enters `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Over,
}

//=== Kinematics ==========================================================

/// Plain copy of the actor's motion state, used for one physics step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kinematics {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    pub grounded: bool,
    /// Respawn count observed when this copy was taken.
    pub generation: u64,
}

impl Kinematics {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

//=== Actor ===============================================================

/// The externally controlled entity.
///
/// Every motion field is a relaxed atomic: control input and physics
/// write them without coordination, last writer wins. Lives are not
/// stored here; they belong to the lives partition of the facade.
///
/// Physics write-back and respawn serialize on the respawn guard, so a
/// step computed before a respawn is never written over it.
#[derive(Debug)]
pub struct Actor {
    x: AtomicF32,
    y: AtomicF32,
    vx: AtomicF32,
    vy: AtomicF32,
    grounded: AtomicBool,
    respawns: Mutex<u64>,
    w: f32,
    h: f32,
}

impl Actor {
    pub fn new(spawn: (f32, f32), size: (f32, f32)) -> Self {
        Self {
            x: AtomicF32::new(spawn.0),
            y: AtomicF32::new(spawn.1),
            vx: AtomicF32::new(0.0),
            vy: AtomicF32::new(0.0),
            grounded: AtomicBool::new(false),
            respawns: Mutex::new(0),
            w: size.0,
            h: size.1,
        }
    }

    pub fn kinematics(&self) -> Kinematics {
        let generation = self.generation();
        Kinematics {
            generation,
            x: self.x.load(),
            y: self.y.load(),
            vx: self.vx.load(),
            vy: self.vy.load(),
            w: self.w,
            h: self.h,
            grounded: self.grounded.load(Ordering::Relaxed),
        }
    }

    /// Writes back the result of a physics step.
    ///
    /// Returns false, writing nothing, if the actor respawned since `k`
    /// was read.
    pub fn apply(&self, k: &Kinematics) -> bool {
        let respawns = self.respawns.lock();
        if *respawns != k.generation {
            return false;
        }
        self.x.store(k.x);
        self.y.store(k.y);
        self.vx.store(k.vx);
        self.vy.store(k.vy);
        self.grounded.store(k.grounded, Ordering::Relaxed);
        true
    }

    /// Number of respawns so far.
    pub fn generation(&self) -> u64 {
        *self.respawns.lock()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x.load(), self.y.load(), self.w, self.h)
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded.load(Ordering::Relaxed)
    }

    pub fn set_horizontal_velocity(&self, vx: f32) {
        self.vx.store(vx);
    }

    /// Launches the actor upwards. Returns false when airborne.
    pub fn launch(&self, impulse: f32) -> bool {
        if !self.is_grounded() {
            return false;
        }
        self.vy.store(impulse);
        self.grounded.store(false, Ordering::Relaxed);
        true
    }

    /// Places the actor back on the spawn point at rest.
    ///
    /// Only the facade calls this, with the lives lock held.
    pub(crate) fn respawn(&self, spawn: (f32, f32)) {
        let mut respawns = self.respawns.lock();
        *respawns += 1;
        self.x.store(spawn.0);
        self.y.store(spawn.1);
        self.vx.store(0.0);
        self.vy.store(0.0);
        self.grounded.store(false, Ordering::Relaxed);
    }
}

//=== Obstacle ============================================================

/// Plain copy of an obstacle's patrol state, used for one movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    pub bounds: Rect,
    pub speed: f32,
    pub direction: Direction,
}

/// A pool-managed patrolling hazard.
///
/// `x` and `heading` are written only by the obstacle's own worker.
/// `active` is cleared once, by the facade, under the lives lock.
#[derive(Debug)]
pub struct Obstacle {
    id: usize,
    x: AtomicF32,
    heading_right: AtomicBool,
    active: AtomicBool,
    y: f32,
    w: f32,
    h: f32,
    speed: f32,
}

impl Obstacle {
    pub fn new(id: usize, rect: Rect, speed: f32, direction: Direction) -> Self {
        Self {
            id,
            x: AtomicF32::new(rect.x),
            heading_right: AtomicBool::new(direction == Direction::Right),
            active: AtomicBool::new(true),
            y: rect.y,
            w: rect.w,
            h: rect.h,
            speed,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x.load(), self.y, self.w, self.h)
    }

    pub fn direction(&self) -> Direction {
        if self.heading_right.load(Ordering::Relaxed) {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn patrol(&self) -> Patrol {
        Patrol {
            bounds: self.bounds(),
            speed: self.speed,
            direction: self.direction(),
        }
    }

    /// Writes back the result of a movement step. Owner worker only.
    pub(crate) fn apply(&self, patrol: &Patrol) {
        self.x.store(patrol.bounds.x);
        self.heading_right
            .store(patrol.direction == Direction::Right, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Clears `active`; true if this call performed the transition.
    pub(crate) fn deactivate(&self) -> bool {
        self.active.swap(false, Ordering::AcqRel)
    }
}

//=== Collectible =========================================================

/// One-time pickup. Its `collected` flag is held by the score partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collectible {
    pub id: usize,
    pub bounds: Rect,
}

//=========================================================================
// Unit Tests
//=========================================================================
