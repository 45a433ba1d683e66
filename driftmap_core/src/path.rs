//! Path Assembler - time-ordered positional trails for a single agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sample::PositionSample;

/// One vertex of an agent's trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// When the position was observed
    pub observed_at: DateTime<Utc>,
}

/// An agent's trail over a time window, ascending by observation time.
///
/// Empty is a valid trail (no samples in the window).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Trail vertices, non-decreasing `observed_at`
    pub points: Vec<PathPoint>,
}

impl Path {
    /// Number of vertices in the trail.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the window held no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Orders one agent's samples into a trail.
///
/// Stable ascending sort on `observed_at`: samples sharing a timestamp keep
/// their original relative order. Idempotent - re-assembling an assembled
/// trail changes nothing.
pub fn assemble_path(samples: &[PositionSample]) -> Path {
    let mut points: Vec<PathPoint> = samples
        .iter()
        .map(|s| PathPoint {
            latitude: s.latitude,
            longitude: s.longitude,
            observed_at: s.observed_at,
        })
        .collect();

    points.sort_by_key(|p| p.observed_at);

    Path { points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::AgentId;
    use chrono::{TimeZone, Utc};

    fn sample(lat: f64, lon: f64, minute: u32) -> PositionSample {
        PositionSample::new(
            AgentId::from_seed(1),
            lat,
            lon,
            Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap(),
        )
    }

    #[test]
    fn test_empty_input_yields_empty_path() {
        let path = assemble_path(&[]);
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
    }

    #[test]
    fn test_sorts_ascending_by_time() {
        let samples = vec![sample(3.0, 3.0, 30), sample(1.0, 1.0, 10), sample(2.0, 2.0, 20)];
        let path = assemble_path(&samples);

        let minutes: Vec<f64> = path.points.iter().map(|p| p.latitude).collect();
        assert_eq!(minutes, vec![1.0, 2.0, 3.0]);
        for w in path.points.windows(2) {
            assert!(w[0].observed_at <= w[1].observed_at);
        }
    }

    #[test]
    fn test_stable_for_equal_timestamps() {
        // Two samples at the same instant keep their input order
        let samples = vec![
            sample(1.0, 1.0, 10),
            sample(2.0, 2.0, 5),
            sample(3.0, 3.0, 10),
        ];
        let path = assemble_path(&samples);

        assert_eq!(path.points[0].latitude, 2.0);
        assert_eq!(path.points[1].latitude, 1.0);
        assert_eq!(path.points[2].latitude, 3.0);
    }

    #[test]
    fn test_idempotent_under_reassembly() {
        let samples = vec![sample(3.0, 3.0, 30), sample(1.0, 1.0, 10), sample(2.0, 2.0, 20)];
        let once = assemble_path(&samples);

        // Rebuild samples from the assembled path and assemble again
        let resorted: Vec<PositionSample> = once
            .points
            .iter()
            .map(|p| PositionSample::new(AgentId::from_seed(1), p.latitude, p.longitude, p.observed_at))
            .collect();
        let twice = assemble_path(&resorted);

        assert_eq!(once, twice);
    }
}
