//! Error types for the backtester.

use thiserror::Error;

/// Top-level backtester error.
///
/// Only fatal, pre-simulation faults are surfaced through this type.
/// Per-bar degraded conditions (missing indicator values, undefined ATR)
/// are absorbed inside the engine as "no action this bar" and never
/// reach the caller.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Empty bar sequence: nothing to simulate")]
    EmptyData,

    #[error("Bar timestamps must be strictly increasing: violation at index {index}")]
    NonMonotonicTimestamps { index: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for backtester operations.
pub type EngineResult<T> = Result<T, EngineError>;
