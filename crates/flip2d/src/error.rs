//! Error types for scene construction and configuration.
//!
//! Only setup paths return errors. Stepping never fails: degenerate cases in
//! the hot path (empty weights, closed cells, coincident particles) are skipped.

use thiserror::Error;

/// Result alias used by constructors and config I/O.
pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    /// Tank width or height is not a positive finite number.
    #[error("tank {name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },

    #[error("cell spacing must be positive, got {0}")]
    InvalidSpacing(f32),

    #[error("particle radius must be positive, got {0}")]
    InvalidParticleRadius(f32),

    #[error("particle capacity must be at least 1")]
    ZeroCapacity,

    /// The lattice needs an interior ring inside the solid border.
    #[error("grid of {nx}x{ny} cells has no interior, need at least 3x3")]
    GridTooSmall { nx: usize, ny: usize },

    #[error("parameter {name} = {value} is invalid: {reason}")]
    InvalidParam {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("particle capacity of {capacity} exhausted")]
    CapacityExceeded { capacity: usize },

    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn param(name: &'static str, value: f32, reason: &'static str) -> Self {
        Self::InvalidParam {
            name,
            value,
            reason,
        }
    }
}
