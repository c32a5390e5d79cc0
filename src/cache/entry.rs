//! Cache Entry Module
//!
//! Defines the structure of an individual cache entry and its armed expiry
//! task.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

// == Cache Entry ==
/// A single cache entry: the stored value, its wall-clock deadlines, and the
/// handle of the expiry task armed for it.
///
/// The handle is the cancellation point: aborting it defuses the pending
/// deletion. `JoinHandle::abort` is idempotent, so aborting an entry whose
/// task has already fired or been aborted is a harmless no-op.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value, opaque to the cache
    pub value: V,
    /// Insertion timestamp
    pub created_at: DateTime<Utc>,
    /// Wall-clock deadline at which the entry expires
    pub expires_at: DateTime<Utc>,
    /// Arming token; the expiry task only pops an entry still carrying its own
    pub(crate) generation: u64,
    /// Handle of the expiry task armed at insertion
    pub(crate) expiry: JoinHandle<()>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry expiring `ttl` from `created_at`, guarded by the
    /// expiry task armed under `generation`.
    pub(crate) fn new(
        value: V,
        created_at: DateTime<Utc>,
        ttl: Duration,
        generation: u64,
        expiry: JoinHandle<()>,
    ) -> Self {
        let expires_at = created_at
            + chrono::TimeDelta::from_std(ttl).unwrap_or(chrono::TimeDelta::MAX);

        Self {
            value,
            created_at,
            expires_at,
            generation,
            expiry,
        }
    }

    // == Is Expired ==
    /// Whether the wall clock has reached the entry's deadline.
    ///
    /// Boundary condition: the entry counts as expired once the current time
    /// is greater than or equal to `expires_at`.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining time until expiry, saturating to zero once the deadline has
    /// passed. Useful for debugging output and tests.
    pub fn ttl_remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
    }

    /// Aborts the armed expiry task. Safe to call more than once.
    pub(crate) fn defuse(&self) {
        self.expiry.abort();
    }
}
