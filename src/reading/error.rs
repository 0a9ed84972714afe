//! Reading error types
//!
//! Defines all errors that can occur while generating, buffering or fitting readings.

use thiserror::Error;

/// Errors that can occur in the reading layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadingError {
    /// Temperature range is empty, inverted or not finite
    #[error("Invalid temperature range: [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    /// History buffer capacity must be at least one
    #[error("Invalid history capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Sampling interval must be non-zero
    #[error("Invalid sampling interval: must be greater than zero")]
    InvalidInterval,

    /// Rounding precision out of bounds
    #[error("Invalid precision: {0} decimal places (maximum is 6)")]
    InvalidPrecision(u32),

    /// Not enough readings for the requested computation
    #[error("Insufficient data: need at least {needed} readings, have {actual}")]
    InsufficientData { needed: usize, actual: usize },

    /// A value was NaN or infinite
    #[error("Non-finite value at index {0}")]
    NonFinite(usize),

    /// Nothing has been sampled yet
    #[error("No readings available yet")]
    NoReadings,
}

/// Result type alias for reading operations
pub type ReadingResult<T> = Result<T, ReadingError>;
