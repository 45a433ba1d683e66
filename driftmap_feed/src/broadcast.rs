//! Snapshot Broadcaster - the shared live-feed poll task.
//!
//! An obvious alternative runs one poll-push loop per connection, each
//! querying the store independently. This module is a single shared task per
//! service instead: one store query per tick, one [`Snapshot`] fanned out to
//! every registered subscriber. Subscribers see the same data at the same
//! cadence, and the duplicated backend load is gone.
//!
//! Per-connection isolation survives the redesign:
//! - a closed receiver unregisters only that subscriber
//! - a full buffer skips only that subscriber for the tick (a slow consumer
//!   never blocks the loop or its peers)
//! - a store failure skips the whole tick and the loop carries on

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::error::StoreError;
use crate::registry::SubscriberRegistry;
use crate::snapshot::Snapshot;
use crate::store::SampleStore;

/// Look-back window for snapshot samples, in hours.
///
/// Shorter than the heatmap's activity window: the live feed shows recent
/// movement, not the full day.
const SNAPSHOT_WINDOW_HOURS: i64 = 1;

/// The shared poll-and-fan-out task.
pub struct SnapshotBroadcaster<S> {
    store: Arc<S>,
    registry: Arc<SubscriberRegistry>,
    config: FeedConfig,
}

impl<S: SampleStore> SnapshotBroadcaster<S> {
    /// Creates a broadcaster over an injected store and registry.
    pub fn new(store: Arc<S>, registry: Arc<SubscriberRegistry>, config: FeedConfig) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Runs the tick loop until the shutdown signal fires.
    ///
    /// On shutdown the registry is cleared, which closes every subscriber's
    /// stream.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.update_interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick().await,
                _ = shutdown.changed() => break,
            }
        }

        self.registry.clear();
        debug!("snapshot broadcaster stopped");
    }

    /// One poll-and-fan-out cycle.
    async fn tick(&self) {
        let receivers = self.registry.senders();
        if receivers.is_empty() {
            return; // nobody listening, skip the store round-trip
        }

        let snapshot = match self.build_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // Upstream trouble never kills the loop; subscribers just
                // miss this tick
                warn!("snapshot query failed, skipping tick: {e}");
                return;
            }
        };

        for (id, tx) in receivers {
            match tx.try_send(snapshot.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    debug!("subscriber {id} lagging, snapshot dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    self.registry.unregister(id);
                    info!("subscriber {id} disconnected");
                }
            }
        }
    }

    /// Queries the store and assembles one snapshot.
    async fn build_snapshot(&self) -> Result<Snapshot, StoreError> {
        let now = Utc::now();

        let recent_samples = self
            .store
            .list_recent_positions(now - Duration::hours(SNAPSHOT_WINDOW_HOURS))
            .await?;
        let active_agents = self
            .store
            .list_active_agents(now - self.config.freshness())
            .await?;

        Ok(Snapshot {
            recent_samples,
            active_agents,
            generated_at: now,
        })
    }
}
