//! DriftMap Feed - Live Snapshot Distribution Layer
//!
//! Connects the pure density engines in `driftmap_core` to a backing sample
//! store and a set of live subscribers:
//!
//! - [`SampleStore`]: the async gateway trait over the backing store
//! - [`MemoryStore`]: the in-process reference store (tests, simulation)
//! - [`SubscriberRegistry`]: the set of currently connected subscribers
//! - [`SnapshotBroadcaster`]: one shared poll task fanning a fresh
//!   [`Snapshot`] out to every subscriber each tick
//! - [`LocationService`]: the transport-agnostic facade callers bind their
//!   HTTP/WebSocket layer to
//!
//! All pieces are explicitly constructed and injected - there is no ambient
//! global client or registry. Construct a [`LocationService`] inside a tokio
//! runtime, hand out [`LiveFeed`]s, and call `shutdown()` for teardown.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod memory;
pub mod registry;
pub mod service;
pub mod snapshot;
pub mod store;

// Re-export key types for convenience
pub use broadcast::SnapshotBroadcaster;
pub use config::FeedConfig;
pub use error::{FeedError, StoreError};
pub use memory::MemoryStore;
pub use registry::{SubscriberId, SubscriberRegistry};
pub use service::{LiveFeed, LocationService};
pub use snapshot::Snapshot;
pub use store::SampleStore;
