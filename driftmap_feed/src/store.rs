//! Sample store gateway abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use driftmap_core::{AgentId, AgentStatus, PositionSample};

use crate::error::StoreError;

/// Abstraction over the backing position/status store.
///
/// The durable backend (and its query language) is an external collaborator;
/// this trait is the whole surface the feed layer consumes. Implementations
/// own validation: coordinates are checked at this boundary
/// ([`PositionSample::validate`]), so the engines downstream never re-check.
///
/// # Implementations
///
/// - **Reference / simulation**: [`crate::MemoryStore`]
/// - **Production**: an HTTP or database client binding, out of scope here
#[async_trait]
pub trait SampleStore: Send + Sync + 'static {
    /// Returns all position samples observed at or after `since`.
    async fn list_recent_positions(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<PositionSample>, StoreError>;

    /// Returns status records for agents last seen at or after `since`.
    async fn list_active_agents(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<AgentStatus>, StoreError>;

    /// Returns one agent's samples at or after `since`, ascending by
    /// observation time.
    async fn list_agent_positions(
        &self,
        agent_id: AgentId,
        since: DateTime<Utc>,
    ) -> Result<Vec<PositionSample>, StoreError>;
}
