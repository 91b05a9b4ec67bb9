//=========================================================================
// Error Types
//=========================================================================
//
// Errors surfaced by the engine's public API.
//
// Semaphore contention is never an error (it blocks), and worker faults
// are contained inside the worker that raised them, so neither appears
// here.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::world::Phase;

//=== EngineError =========================================================

/// Errors returned by [`crate::EngineBuilder`] and [`crate::Engine`].
#[derive(Error, Debug)]
pub enum EngineError {
    /// A lifecycle operation was requested from a phase that forbids it.
    #[error("cannot {action} while engine is {from:?}")]
    InvalidTransition {
        /// Phase the engine was in when the request arrived.
        from: Phase,
        /// The rejected operation.
        action: &'static str,
    },

    /// The supplied configuration failed validation or could not be read.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker {name}: {source}")]
    WorkerSpawn {
        /// Thread name of the worker.
        name: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

//=== ConfigError =========================================================

/// Reasons a configuration is rejected.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A dimension, interval or count that must be positive was not.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A physics constant was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The obstacle pool limit was zero.
    #[error("actor pool limit must be at least 1")]
    ZeroPoolLimit,

    /// The level layout places an entity that cannot exist.
    #[error("invalid level layout: {0}")]
    InvalidLayout(String),

    /// The TOML source could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

//=========================================================================
// Unit Tests
//=========================================================================
