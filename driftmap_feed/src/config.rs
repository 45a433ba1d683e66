//! Service configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::LocationService`].
///
/// The recognized options and their defaults match the operational knobs of
/// the feed: grid resolution and smoothing for heatmaps, the activity
/// look-back window, the live-feed tick interval, and the freshness
/// threshold deciding which agents count as active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Grid points per axis for heatmap fields (default: 100)
    pub heatmap_resolution: usize,

    /// Gaussian smoothing sigma, in grid-index units (default: 1.5)
    pub heatmap_smoothing: f64,

    /// Look-back window for heatmaps and paths, in hours (default: 24)
    pub activity_window_hours: i64,

    /// Interval between live snapshots, in seconds (default: 30)
    pub update_interval_seconds: u64,

    /// Last-seen threshold for "active" agents, in minutes (default: 5)
    pub active_agent_freshness_minutes: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            heatmap_resolution: 100,
            heatmap_smoothing: 1.5,
            activity_window_hours: 24,
            update_interval_seconds: 30,
            active_agent_freshness_minutes: 5,
        }
    }
}

impl FeedConfig {
    /// The heatmap/path activity window as a chrono duration.
    pub fn activity_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.activity_window_hours)
    }

    /// The broadcast tick interval as a std duration.
    pub fn update_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.update_interval_seconds)
    }

    /// The active-agent freshness threshold as a chrono duration.
    pub fn freshness(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.active_agent_freshness_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contract() {
        let config = FeedConfig::default();

        assert_eq!(config.heatmap_resolution, 100);
        assert_eq!(config.heatmap_smoothing, 1.5);
        assert_eq!(config.activity_window_hours, 24);
        assert_eq!(config.update_interval_seconds, 30);
        assert_eq!(config.active_agent_freshness_minutes, 5);
    }

    #[test]
    fn test_duration_accessors() {
        let config = FeedConfig::default();

        assert_eq!(config.activity_window(), chrono::Duration::hours(24));
        assert_eq!(config.update_interval(), std::time::Duration::from_secs(30));
        assert_eq!(config.freshness(), chrono::Duration::minutes(5));
    }
}
