//! Density Estimator - smoothed spatial density fields from point samples.
//!
//! The pipeline mirrors the heatmap artifact contract:
//! 1. every sample carries unit weight (repeated coordinates are NOT
//!    pre-aggregated here - markers handle that separately)
//! 2. scattered-data linear interpolation onto the grid, 0 outside the
//!    convex hull of the samples
//! 3. isotropic Gaussian smoothing in grid-index space
//!
//! Deterministic given identical inputs; no dependence on sample order.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::grid::{build_grid, GridAxes};
use crate::interp::LinearInterpolator;
use crate::marker::{aggregate_markers, MarkerAggregate};
use crate::sample::PositionSample;
use crate::smooth::gaussian_smooth;

/// A rectangular grid of non-negative density weights.
///
/// Invariant: `values.shape() == (y.len(), x.len())`. Constructed fresh per
/// request, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityField {
    /// Longitude axis, ascending
    pub x: Vec<f64>,

    /// Latitude axis, ascending
    pub y: Vec<f64>,

    /// Density matrix, row `j` = latitude `y[j]`, column `i` = longitude `x[i]`
    pub values: DMatrix<f64>,
}

impl DensityField {
    /// The degenerate artifact returned when no samples are in the window.
    pub fn empty() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            values: DMatrix::zeros(0, 0),
        }
    }

    /// True when the field carries no grid at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (rows, cols) of the value matrix.
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Rows of the value matrix, outermost = first latitude.
    ///
    /// Convenience for callers assembling a serialized chart payload.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.values.nrows())
            .map(|r| self.values.row(r).iter().copied().collect())
            .collect()
    }
}

/// The combined heatmap artifact: a density field plus point markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapArtifact {
    /// Smoothed density over the bounding grid
    pub field: DensityField,

    /// Per-coordinate activity markers
    pub markers: Vec<MarkerAggregate>,
}

impl HeatmapArtifact {
    /// The artifact for an empty sample window.
    pub fn empty() -> Self {
        Self {
            field: DensityField::empty(),
            markers: Vec::new(),
        }
    }
}

/// Interpolates unit-weight samples onto the grid and smooths the result.
///
/// Empty samples yield `DensityField::empty()` rather than failing. Grid
/// nodes outside the convex hull of the sample coordinates are filled with
/// exactly 0, as are all nodes when the configuration is degenerate
/// (fewer than 3 distinct coordinates, or all collinear).
pub fn estimate_density(
    samples: &[PositionSample],
    axes: &GridAxes,
    smoothing_sigma: f64,
) -> DensityField {
    if samples.is_empty() {
        return DensityField::empty();
    }

    let points: Vec<[f64; 2]> = samples
        .iter()
        .map(|s| [s.longitude, s.latitude])
        .collect();
    let weights = vec![1.0; points.len()];

    let raw = match LinearInterpolator::fit(&points, &weights) {
        Some(interp) => {
            let mut m = DMatrix::zeros(axes.y.len(), axes.x.len());
            for (j, &lat) in axes.y.iter().enumerate() {
                for (i, &lon) in axes.x.iter().enumerate() {
                    m[(j, i)] = interp.eval(lon, lat).unwrap_or(0.0);
                }
            }
            m
        }
        // Degenerate sample geometry: best-effort fill over the whole grid
        None => DMatrix::zeros(axes.y.len(), axes.x.len()),
    };

    DensityField {
        x: axes.x.clone(),
        y: axes.y.clone(),
        values: gaussian_smooth(&raw, smoothing_sigma),
    }
}

/// Assembles the full heatmap artifact for a sample window.
///
/// Empty windows short-circuit to an empty artifact before any grid is
/// built, so `build_grid`'s non-empty precondition always holds.
pub fn build_heatmap(
    samples: &[PositionSample],
    resolution: usize,
    smoothing_sigma: f64,
) -> Result<HeatmapArtifact, FieldError> {
    if samples.is_empty() {
        return Ok(HeatmapArtifact::empty());
    }

    let axes = build_grid(samples, resolution)?;
    let field = estimate_density(samples, &axes, smoothing_sigma);
    let markers = aggregate_markers(samples);

    Ok(HeatmapArtifact { field, markers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::AgentId;
    use chrono::{TimeZone, Utc};

    fn sample_at(lat: f64, lon: f64) -> PositionSample {
        PositionSample::new(
            AgentId::from_seed(0),
            lat,
            lon,
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        )
    }

    fn spread_samples() -> Vec<PositionSample> {
        vec![
            sample_at(10.0, 10.0),
            sample_at(10.0, 14.0),
            sample_at(14.0, 10.0),
            sample_at(14.0, 14.0),
            sample_at(12.0, 12.0),
        ]
    }

    #[test]
    fn test_empty_samples_yield_empty_field() {
        let axes = GridAxes {
            x: vec![0.0, 1.0],
            y: vec![0.0, 1.0],
        };
        let field = estimate_density(&[], &axes, 1.5);

        assert!(field.is_empty());
        assert_eq!(field.shape(), (0, 0));
    }

    #[test]
    fn test_shape_matches_resolution() {
        let samples = spread_samples();
        let axes = build_grid(&samples, 20).unwrap();
        let field = estimate_density(&samples, &axes, 1.5);

        assert_eq!(field.shape(), (20, 20));
        assert_eq!(field.x.len(), 20);
        assert_eq!(field.y.len(), 20);
    }

    #[test]
    fn test_values_nonnegative_and_positive_inside_hull() {
        let samples = spread_samples();
        let axes = build_grid(&samples, 20).unwrap();
        let field = estimate_density(&samples, &axes, 1.5);

        assert!(field.values.iter().all(|&v| v >= 0.0));
        // Grid center is well inside the hull of the samples
        assert!(field.values[(10, 10)] > 0.0);
    }

    #[test]
    fn test_order_independence() {
        let mut samples = spread_samples();
        let axes = build_grid(&samples, 16).unwrap();
        let forward = estimate_density(&samples, &axes, 1.5);

        samples.reverse();
        let reversed = estimate_density(&samples, &axes, 1.5);

        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_degenerate_collinear_samples_fill_zero() {
        let samples = vec![
            sample_at(10.0, 10.0),
            sample_at(11.0, 11.0),
            sample_at(12.0, 12.0),
        ];
        let axes = build_grid(&samples, 8).unwrap();
        let field = estimate_density(&samples, &axes, 1.5);

        assert_eq!(field.shape(), (8, 8));
        assert!(field.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unsmoothed_interior_is_unity() {
        let samples = spread_samples();
        let axes = build_grid(&samples, 11).unwrap();
        let field = estimate_density(&samples, &axes, 0.0);

        // Unit weights linearly interpolated are 1 everywhere inside the hull
        approx::assert_relative_eq!(field.values[(5, 5)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_build_heatmap_empty_window() {
        let artifact = build_heatmap(&[], 100, 1.5).unwrap();

        assert!(artifact.field.is_empty());
        assert!(artifact.markers.is_empty());
    }

    #[test]
    fn test_build_heatmap_assembles_field_and_markers() {
        let samples = spread_samples();
        let artifact = build_heatmap(&samples, 12, 1.5).unwrap();

        assert_eq!(artifact.field.shape(), (12, 12));
        assert_eq!(artifact.markers.len(), 5);
        assert!(artifact.markers.iter().all(|m| m.weight == 1));
    }
}
