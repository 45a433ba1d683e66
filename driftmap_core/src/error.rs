//! Error types for the density field engines.

use thiserror::Error;

/// Errors that can occur while building density field artifacts.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Grid construction was asked to cover an empty sample set
    #[error("cannot build a grid over an empty sample set")]
    EmptySamples,

    /// Grid resolution must be at least one point per axis
    #[error("invalid grid resolution: {0}")]
    InvalidResolution(usize),

    /// Coordinate outside the valid WGS84 ranges
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    CoordinateOutOfRange { lat: f64, lon: f64 },
}
