//! Error types for the live distribution layer.

use driftmap_core::FieldError;
use thiserror::Error;

/// Failures reported by a backing sample store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the query
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time
    #[error("store timeout after {0}ms")]
    Timeout(u64),

    /// A record failed validation at the ingestion boundary
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Creates a malformed-record error.
    pub fn malformed(msg: impl std::fmt::Display) -> Self {
        Self::Malformed(msg.to_string())
    }
}

/// Errors surfaced to callers of the service facade.
///
/// An upstream failure is always distinguishable from a legitimately empty
/// artifact: empty windows produce `Ok` with empty contents, never an error.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The backing store failed; retry later
    #[error("upstream store failure: {0}")]
    Upstream(#[from] StoreError),

    /// Density field computation rejected its inputs (e.g. zero resolution)
    #[error("field computation failed: {0}")]
    Field(#[from] FieldError),
}
