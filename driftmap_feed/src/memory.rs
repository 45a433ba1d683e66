//! In-memory reference implementation of the sample store gateway.
//!
//! Used by tests and the simulation harness. Validates coordinates at the
//! ingestion boundary and maintains per-agent presence records, so the data
//! handed to the engines is always well-formed. Supports one-shot fault
//! injection to exercise upstream-unavailable paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use driftmap_core::{AgentId, AgentStatus, PositionSample};

use crate::error::StoreError;
use crate::store::SampleStore;

#[derive(Debug, Default)]
struct MemoryInner {
    samples: Vec<PositionSample>,
    statuses: HashMap<AgentId, AgentStatus>,
}

/// An in-process sample store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,

    /// When set, the next query fails with `StoreError::Unavailable`
    fail_next: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests one position sample.
    ///
    /// Rejects out-of-range coordinates and refreshes the agent's presence
    /// record (`last_seen` = observation time).
    pub fn push_sample(&self, sample: PositionSample) -> Result<(), StoreError> {
        sample.validate().map_err(StoreError::malformed)?;

        let mut inner = self.inner.lock().unwrap();
        inner
            .statuses
            .entry(sample.agent_id)
            .and_modify(|s| {
                if s.last_seen < sample.observed_at {
                    s.last_seen = sample.observed_at;
                }
            })
            .or_insert_with(|| AgentStatus {
                id: sample.agent_id,
                name: format!("agent-{}", sample.agent_id),
                status: "online".to_string(),
                last_seen: sample.observed_at,
                device_type: "unknown".to_string(),
            });
        inner.samples.push(sample);

        Ok(())
    }

    /// Inserts or replaces an agent's presence record.
    pub fn upsert_status(&self, status: AgentStatus) {
        self.inner.lock().unwrap().statuses.insert(status.id, status);
    }

    /// Makes the next query fail (upstream-unavailable testing).
    pub fn fail_next_query(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Total number of stored samples.
    pub fn sample_count(&self) -> usize {
        self.inner.lock().unwrap().samples.len()
    }

    fn check_fault(&self) -> Result<(), StoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(StoreError::unavailable("injected fault"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SampleStore for MemoryStore {
    async fn list_recent_positions(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<PositionSample>, StoreError> {
        self.check_fault()?;

        let inner = self.inner.lock().unwrap();
        Ok(inner
            .samples
            .iter()
            .filter(|s| s.observed_at >= since)
            .cloned()
            .collect())
    }

    async fn list_active_agents(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<AgentStatus>, StoreError> {
        self.check_fault()?;

        let inner = self.inner.lock().unwrap();
        let mut active: Vec<AgentStatus> = inner
            .statuses
            .values()
            .filter(|s| s.last_seen >= since)
            .cloned()
            .collect();
        active.sort_by_key(|s| s.id);
        Ok(active)
    }

    async fn list_agent_positions(
        &self,
        agent_id: AgentId,
        since: DateTime<Utc>,
    ) -> Result<Vec<PositionSample>, StoreError> {
        self.check_fault()?;

        let inner = self.inner.lock().unwrap();
        let mut positions: Vec<PositionSample> = inner
            .samples
            .iter()
            .filter(|s| s.agent_id == agent_id && s.observed_at >= since)
            .cloned()
            .collect();
        positions.sort_by_key(|s| s.observed_at);
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap()
    }

    fn sample(agent: u64, lat: f64, lon: f64, minute: u32) -> PositionSample {
        PositionSample::new(AgentId::from_seed(agent), lat, lon, at(minute))
    }

    #[tokio::test]
    async fn test_recent_positions_respects_window() {
        let store = MemoryStore::new();
        store.push_sample(sample(1, 10.0, 10.0, 0)).unwrap();
        store.push_sample(sample(1, 11.0, 11.0, 30)).unwrap();

        let recent = store.list_recent_positions(at(15)).await.unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].latitude, 11.0);
    }

    #[tokio::test]
    async fn test_rejects_malformed_coordinates() {
        let store = MemoryStore::new();

        let err = store.push_sample(sample(1, 95.0, 0.0, 0)).unwrap_err();

        assert!(matches!(err, StoreError::Malformed(_)));
        assert_eq!(store.sample_count(), 0);
    }

    #[tokio::test]
    async fn test_push_refreshes_presence() {
        let store = MemoryStore::new();
        store.push_sample(sample(1, 10.0, 10.0, 5)).unwrap();
        store.push_sample(sample(1, 10.5, 10.5, 25)).unwrap();

        let active = store.list_active_agents(at(20)).await.unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].last_seen, at(25));
    }

    #[tokio::test]
    async fn test_stale_agents_filtered_out() {
        let store = MemoryStore::new();
        store.push_sample(sample(1, 10.0, 10.0, 0)).unwrap();
        store.push_sample(sample(2, 20.0, 20.0, 30)).unwrap();

        let active = store
            .list_active_agents(at(30) - Duration::minutes(5))
            .await
            .unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, AgentId::from_seed(2));
    }

    #[tokio::test]
    async fn test_agent_positions_sorted_ascending() {
        let store = MemoryStore::new();
        store.push_sample(sample(1, 3.0, 3.0, 30)).unwrap();
        store.push_sample(sample(1, 1.0, 1.0, 10)).unwrap();
        store.push_sample(sample(2, 9.0, 9.0, 20)).unwrap();

        let positions = store
            .list_agent_positions(AgentId::from_seed(1), at(0))
            .await
            .unwrap();

        assert_eq!(positions.len(), 2);
        assert!(positions[0].observed_at < positions[1].observed_at);
    }

    #[tokio::test]
    async fn test_fault_injection_fails_one_query() {
        let store = MemoryStore::new();
        store.push_sample(sample(1, 10.0, 10.0, 0)).unwrap();
        store.fail_next_query();

        let first = store.list_recent_positions(at(0)).await;
        let second = store.list_recent_positions(at(0)).await;

        assert!(matches!(first, Err(StoreError::Unavailable(_))));
        assert_eq!(second.unwrap().len(), 1);
    }
}
