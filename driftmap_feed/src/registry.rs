//! Subscriber Registry - the set of currently connected live-feed clients.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::snapshot::Snapshot;

/// Unique handle for a registered subscriber connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub Uuid);

impl SubscriberId {
    /// Creates a new random SubscriberId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic SubscriberId from a seed (for tests).
    pub fn from_seed(seed: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&seed.to_le_bytes());
        bytes[8..16].copy_from_slice(&seed.wrapping_mul(0x9e3779b97f4a7c15).to_le_bytes());
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Tracks the currently connected subscribers and their snapshot channels.
///
/// Connection lifecycle: connecting -> accepted (after [`register`]) ->
/// active -> closed (after [`unregister`]). A closed handle never becomes
/// active again; a new registration gets a fresh handle.
///
/// Safe to share across the broadcaster and any number of service handlers:
/// iteration works on a point-in-time copy ([`senders`]), so a concurrent
/// unregistration never invalidates an in-progress fan-out.
///
/// [`register`]: SubscriberRegistry::register
/// [`unregister`]: SubscriberRegistry::unregister
/// [`senders`]: SubscriberRegistry::senders
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    /// Active subscriber channels, keyed by handle
    inner: Mutex<HashMap<SubscriberId, mpsc::Sender<Snapshot>>>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a newly established connection into the active set.
    ///
    /// The mpsc channel needs no further handshake, so registration alone
    /// completes the accept step; the returned handle identifies the
    /// connection from here on.
    pub fn register(&self, sender: mpsc::Sender<Snapshot>) -> SubscriberId {
        let id = SubscriberId::new();
        self.inner.lock().unwrap().insert(id, sender);
        id
    }

    /// Removes a connection from the active set, releasing its channel.
    ///
    /// Idempotent: unregistering an already-removed handle is a no-op.
    /// Returns whether the handle was still present.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        self.inner.lock().unwrap().remove(&id).is_some()
    }

    /// Point-in-time copy of the active handles.
    pub fn active_handles(&self) -> Vec<SubscriberId> {
        self.inner.lock().unwrap().keys().copied().collect()
    }

    /// Point-in-time copy of the active channels, for fan-out iteration.
    pub fn senders(&self) -> Vec<(SubscriberId, mpsc::Sender<Snapshot>)> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    }

    /// Drops every connection at once (process shutdown).
    ///
    /// Dropping the senders closes each subscriber's stream.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    /// Number of active connections.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// True when no subscriber is connected.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
