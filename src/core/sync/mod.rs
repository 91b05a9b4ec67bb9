//=========================================================================
// Synchronization
//=========================================================================
//
// Everything workers share beyond plain entity data.
//
// Components:
// - `facade`: score/vitals lock partitions and the snapshot copy
// - `semaphore`: counting semaphore with RAII permits
// - `stop_signal`: one-shot cooperative cancellation
//
//=========================================================================

//=== Module Declarations =================================================

mod facade;
mod semaphore;
mod stop_signal;

//=== Public API ==========================================================

pub use facade::{HitOutcome, SyncFacade};
pub use semaphore::{Permit, Semaphore};
pub use stop_signal::StopSignal;

pub(crate) use stop_signal::TickControl;
