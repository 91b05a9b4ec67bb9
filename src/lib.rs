//=========================================================================
// Aetheric Platformer: Library Root
//
// This crate defines the public API surface of the platformer runtime.
//
// Responsibilities:
// - Expose the engine interface (`Engine`, `EngineBuilder`)
// - Expose the world model and synchronization primitives for embedding
// - Keep worker scheduling and event plumbing internal
//
// Typical usage:
// ```no_run
// use aetheric_platformer::{Direction, EngineBuilder};
//
// fn main() -> Result<(), aetheric_platformer::EngineError> {
//     let mut engine = EngineBuilder::new().build()?;
//     engine.start()?;
//     engine.move_and_jump(Direction::Right);
//     println!("score: {}", engine.snapshot().score);
//     engine.stop();
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the world model, the lock partitions and the
// snapshot types. Worker loops inside it stay crate-private.
//
pub mod config;
pub mod core;
pub mod error;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the lifecycle entry point and the event feed.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use crate::config::{EngineConfig, LevelLayout};
pub use crate::core::snapshot::Snapshot;
pub use crate::core::workers::ShutdownReport;
pub use crate::core::world::{Direction, Phase};
pub use crate::error::{ConfigError, EngineError};
pub use engine::event::{EngineEvent, HitCause};
pub use engine::{Engine, EngineBuilder};
