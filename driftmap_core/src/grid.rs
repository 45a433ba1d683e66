//! Grid Builder - rectangular evaluation grids bounding a sample set.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::sample::PositionSample;

/// The evaluation axes of a density field grid.
///
/// `x` holds longitudes, `y` holds latitudes. Both span exactly the
/// [min, max] of the input coordinates and are strictly increasing whenever
/// the samples cover a non-zero geographic span on that axis. A zero-span
/// axis (all samples at the same longitude or latitude) repeats the bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxes {
    /// Longitude evaluation points, ascending
    pub x: Vec<f64>,

    /// Latitude evaluation points, ascending
    pub y: Vec<f64>,
}

impl GridAxes {
    /// Returns the grid resolution (points per axis).
    pub fn resolution(&self) -> usize {
        self.x.len()
    }
}

/// Computes a rectangular grid covering all sample coordinates.
///
/// Produces `resolution` evenly spaced values from min to max inclusive on
/// each axis; `resolution == 1` degenerates to a single point equal to the
/// minimum.
///
/// # Errors
/// * `FieldError::EmptySamples` - callers must short-circuit empty windows
///   to an empty density field before asking for a grid
/// * `FieldError::InvalidResolution` - resolution of zero
pub fn build_grid(samples: &[PositionSample], resolution: usize) -> Result<GridAxes, FieldError> {
    if samples.is_empty() {
        return Err(FieldError::EmptySamples);
    }
    if resolution == 0 {
        return Err(FieldError::InvalidResolution(resolution));
    }

    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;

    for sample in samples {
        min_lon = min_lon.min(sample.longitude);
        max_lon = max_lon.max(sample.longitude);
        min_lat = min_lat.min(sample.latitude);
        max_lat = max_lat.max(sample.latitude);
    }

    Ok(GridAxes {
        x: linspace(min_lon, max_lon, resolution),
        y: linspace(min_lat, max_lat, resolution),
    })
}

/// `n` evenly spaced values from `start` to `end` inclusive.
///
/// Endpoints are exact; `n == 1` yields just `start`.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }

    let step = (end - start) / (n - 1) as f64;
    (0..n)
        .map(|i| {
            if i == n - 1 {
                end
            } else {
                start + step * i as f64
            }
        })
        .collect()
}
