//! Service facade - the transport-agnostic surface callers bind to.
//!
//! A [`LocationService`] owns the injected store, the subscriber registry
//! and the broadcaster task. Construction happens explicitly inside a tokio
//! runtime (no process-wide singletons); [`LocationService::shutdown`] tears
//! everything down, closing every live feed.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use driftmap_core::{assemble_path, build_heatmap, AgentId, AgentStatus, HeatmapArtifact, Path};

use crate::broadcast::SnapshotBroadcaster;
use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::registry::{SubscriberId, SubscriberRegistry};
use crate::snapshot::Snapshot;
use crate::store::SampleStore;

/// Per-subscriber snapshot buffer depth.
///
/// Snapshots supersede each other; a lagging consumer never needs more than
/// a handful in flight.
const FEED_BUFFER: usize = 8;

/// A subscriber's end of the live feed.
///
/// Snapshots arrive in production order. Dropping the handle disconnects
/// the subscriber; the registry entry is removed immediately.
pub struct LiveFeed {
    id: SubscriberId,
    rx: mpsc::Receiver<Snapshot>,
    registry: Arc<SubscriberRegistry>,
}

impl LiveFeed {
    /// The handle identifying this subscription.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the feed is closed (explicit disconnect or
    /// service shutdown) and the buffer is drained.
    pub async fn recv(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

/// The live location service.
///
/// Generic over the store implementation so production bindings and the
/// in-memory store share one code path.
pub struct LocationService<S: SampleStore> {
    store: Arc<S>,
    registry: Arc<SubscriberRegistry>,
    config: FeedConfig,
    shutdown_tx: watch::Sender<bool>,
    broadcaster: JoinHandle<()>,
}

impl<S: SampleStore> LocationService<S> {
    /// Constructs the service and spawns its broadcaster task.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(store: Arc<S>, config: FeedConfig) -> Self {
        let registry = Arc::new(SubscriberRegistry::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let broadcaster = tokio::spawn(
            SnapshotBroadcaster::new(store.clone(), registry.clone(), config.clone())
                .run(shutdown_rx),
        );

        Self {
            store,
            registry,
            config,
            shutdown_tx,
            broadcaster,
        }
    }

    /// The shared subscriber registry.
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Computes the heatmap artifact over the activity window.
    ///
    /// An empty window yields an empty artifact; a store failure surfaces
    /// as `FeedError::Upstream` so the two are never conflated.
    pub async fn get_heatmap(&self) -> Result<HeatmapArtifact, FeedError> {
        let since = Utc::now() - self.config.activity_window();
        let samples = self.store.list_recent_positions(since).await?;

        Ok(build_heatmap(
            &samples,
            self.config.heatmap_resolution,
            self.config.heatmap_smoothing,
        )?)
    }

    /// Lists agents seen within the freshness threshold.
    pub async fn get_active_agents(&self) -> Result<Vec<AgentStatus>, FeedError> {
        let since = Utc::now() - self.config.freshness();
        Ok(self.store.list_active_agents(since).await?)
    }

    /// Assembles one agent's trail over the activity window.
    pub async fn get_agent_path(&self, agent_id: AgentId) -> Result<Path, FeedError> {
        let since = Utc::now() - self.config.activity_window();
        let samples = self.store.list_agent_positions(agent_id, since).await?;
        Ok(assemble_path(&samples))
    }

    /// Opens a live snapshot feed.
    ///
    /// The subscriber starts receiving on the next broadcast tick and stays
    /// registered until the handle drops, the receiver lags out of the
    /// registry, or the service shuts down.
    pub fn open_live_feed(&self) -> LiveFeed {
        let (tx, rx) = mpsc::channel(FEED_BUFFER);
        let id = self.registry.register(tx);
        info!("subscriber {id} connected");

        LiveFeed {
            id,
            rx,
            registry: self.registry.clone(),
        }
    }

    /// Stops the broadcaster and closes every open feed.
    pub async fn shutdown(self) {
        // Ignore send errors: the task may already have stopped
        let _ = self.shutdown_tx.send(true);
        let _ = self.broadcaster.await;
    }
}
