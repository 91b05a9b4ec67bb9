//=========================================================================
// Relaxed Float Cell
//=========================================================================
//
// Lock-free f32 storage for fields that are written outside any critical
// section (control inputs, per-worker kinematics).
//
// All accesses use `Ordering::Relaxed`: readers may observe a stale value,
// never a torn one. No invariant may depend on these fields.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

//=== AtomicF32 ===========================================================

/// An `f32` stored as its bit pattern in an [`AtomicU32`].
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl fmt::Debug for AtomicF32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.load(), f)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
