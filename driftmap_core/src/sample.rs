//! Typed records for position samples and agent status.
//!
//! The backing store returns loosely structured rows; everything entering the
//! engines is converted to these explicit record types at the gateway
//! boundary. Coordinate validation happens there too - the engines themselves
//! assume validated input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;

/// Unique identifier for a mobile agent.
///
/// Uses UUID v4 for global uniqueness without coordination.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Creates a new random AgentId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an AgentId from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Creates a deterministic AgentId from a seed (for tests and simulation).
    pub fn from_seed(seed: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&seed.to_le_bytes());
        bytes[8..16].copy_from_slice(&seed.wrapping_mul(0x517cc1b727220a95).to_le_bytes());
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// One timestamped geographic observation of an agent.
///
/// Immutable once read from the store; the engines only ever see snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// The agent this observation belongs to
    pub agent_id: AgentId,

    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,

    /// Longitude in degrees, [-180, 180]
    pub longitude: f64,

    /// When the position was observed
    pub observed_at: DateTime<Utc>,
}

impl PositionSample {
    /// Creates a new position sample.
    pub fn new(agent_id: AgentId, latitude: f64, longitude: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            agent_id,
            latitude,
            longitude,
            observed_at,
        }
    }

    /// Checks the coordinates against the valid WGS84 ranges.
    ///
    /// Called by gateways at the ingestion boundary; data that reaches the
    /// engines is assumed to have passed this check already.
    pub fn validate(&self) -> Result<(), FieldError> {
        let lat_ok = (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok && self.latitude.is_finite() && self.longitude.is_finite() {
            Ok(())
        } else {
            Err(FieldError::CoordinateOutOfRange {
                lat: self.latitude,
                lon: self.longitude,
            })
        }
    }
}

/// Presence record for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    /// The agent this record describes
    pub id: AgentId,

    /// Human-readable display name
    pub name: String,

    /// Free-form presence state (e.g. "online", "away")
    pub status: String,

    /// Last time the agent was seen by the store
    pub last_seen: DateTime<Utc>,

    /// Reporting device class (e.g. "phone", "tablet")
    pub device_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(lat: f64, lon: f64) -> PositionSample {
        PositionSample::new(
            AgentId::from_seed(1),
            lat,
            lon,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_agent_id_from_seed_deterministic() {
        assert_eq!(AgentId::from_seed(7), AgentId::from_seed(7));
        assert_ne!(AgentId::from_seed(7), AgentId::from_seed(8));
    }

    #[test]
    fn test_validate_accepts_in_range() {
        assert!(sample(45.0, -122.0).validate().is_ok());
        assert!(sample(-90.0, 180.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(sample(91.0, 0.0).validate().is_err());
        assert!(sample(0.0, -181.0).validate().is_err());
        assert!(sample(f64::NAN, 0.0).validate().is_err());
    }
}
