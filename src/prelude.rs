//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types.
//
// Usage:
//   use aetheric_platformer::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};

// Configuration and errors
pub use crate::config::{EngineConfig, LevelLayout, ObstaclePlacement, TickIntervals};
pub use crate::error::{ConfigError, EngineError};

// World model
pub use crate::core::world::{Direction, Phase, Rect};

// Observation
pub use crate::core::snapshot::{ActorView, Snapshot};
pub use crate::engine::event::{EngineEvent, HitCause};
pub use crate::core::workers::ShutdownReport;
