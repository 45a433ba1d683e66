//! DriftMap Core - Spatial Density Field Engines
//!
//! This library derives real-time artifacts from timestamped position samples:
//! 1. **Density Field**: scattered-point interpolation + Gaussian smoothing over
//!    a rectangular grid bounding the recent samples
//! 2. **Marker Aggregates**: per-coordinate activity counts for point overlays
//! 3. **Paths**: time-ordered positional trails for a single agent
//!
//! All engines here are pure, synchronous and stateless - safe to invoke
//! concurrently from any number of request handlers without locking. The async
//! distribution layer lives in `driftmap_feed`.

pub mod density;
pub mod error;
pub mod grid;
pub mod interp;
pub mod marker;
pub mod path;
pub mod sample;
pub mod smooth;

// Re-export key types for convenience
pub use density::{build_heatmap, estimate_density, DensityField, HeatmapArtifact};
pub use error::FieldError;
pub use grid::{build_grid, GridAxes};
pub use marker::{aggregate_markers, MarkerAggregate};
pub use path::{assemble_path, Path, PathPoint};
pub use sample::{AgentId, AgentStatus, PositionSample};
