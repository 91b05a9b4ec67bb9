//=========================================================================
// World
//=========================================================================
//
// Plain entity data plus the aggregate that holds it.
//
// Architecture:
//   WorldState
//     ├─ actor: Actor                (relaxed atomics)
//     ├─ surfaces: Vec<Surface>      (immutable)
//     ├─ obstacles: Vec<Obstacle>    (one owner worker each)
//     └─ collectibles: Vec<Collectible>
//
//=========================================================================

//=== Module Declarations =================================================

mod atomic;
mod entities;
mod world_state;

//=== Public API ==========================================================

pub use atomic::AtomicF32;
pub use entities::{
    Actor, Collectible, Direction, Kinematics, Obstacle, Patrol, Phase, Rect, Surface,
};
pub use world_state::WorldState;
