//! Marker Aggregator - per-coordinate activity counts for point overlays.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sample::{AgentId, PositionSample};

/// Activity count for one agent at one exact coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerAggregate {
    /// The agent observed at this coordinate
    pub agent_id: AgentId,

    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Number of samples at exactly this coordinate
    pub weight: u64,
}

/// Groups samples by (agent, latitude, longitude) and counts each group.
///
/// Grouping equality is bit-exact on the stored f64 coordinates - samples a
/// micro-degree apart form distinct groups. The sum of all weights always
/// equals the input sample count. Output order is deterministic (agent,
/// then coordinate bits).
pub fn aggregate_markers(samples: &[PositionSample]) -> Vec<MarkerAggregate> {
    let mut groups: BTreeMap<(AgentId, u64, u64), MarkerAggregate> = BTreeMap::new();

    for sample in samples {
        let key = (
            sample.agent_id,
            sample.latitude.to_bits(),
            sample.longitude.to_bits(),
        );
        groups
            .entry(key)
            .and_modify(|m| m.weight += 1)
            .or_insert_with(|| MarkerAggregate {
                agent_id: sample.agent_id,
                latitude: sample.latitude,
                longitude: sample.longitude,
                weight: 1,
            });
    }

    groups.into_values().collect()
}
