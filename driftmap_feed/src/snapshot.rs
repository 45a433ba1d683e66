//! Live feed snapshots.

use chrono::{DateTime, Utc};
use driftmap_core::{AgentStatus, PositionSample};
use serde::{Deserialize, Serialize};

/// One point-in-time bundle pushed to live subscribers.
///
/// Transient: produced once per broadcast tick and discarded after fan-out.
/// The sample window here is shorter than the heatmap's activity window -
/// subscribers see recent movement, not the full day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Samples observed within the snapshot look-back window
    pub recent_samples: Vec<PositionSample>,

    /// Agents currently considered active
    pub active_agents: Vec<AgentStatus>,

    /// When this snapshot was assembled
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    /// True when neither samples nor statuses are present.
    pub fn is_empty(&self) -> bool {
        self.recent_samples.is_empty() && self.active_agents.is_empty()
    }
}
