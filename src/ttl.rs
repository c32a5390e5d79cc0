//! TTL Module
//!
//! Defines the `Ttl` input type accepted by [`TimedCache::set`] and its
//! normalization into a concrete sleep duration.
//!
//! Callers sometimes know a relative lifetime ("keep this for ten minutes")
//! and sometimes an externally-imposed absolute deadline ("this API response
//! is valid until 14:00 UTC"). Both are normalized to "seconds from now" at
//! the moment of the call, which is why the cache runs on wall-clock time
//! rather than a monotonic clock.
//!
//! [`TimedCache::set`]: crate::cache::TimedCache::set

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{CacheError, Result};

// == Ttl ==
/// A time-to-live for a cache entry, either relative or absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// A duration counted from the moment of insertion
    Relative(Duration),
    /// A wall-clock deadline at which the entry expires
    Absolute(DateTime<Utc>),
}

impl Ttl {
    // == Resolve ==
    /// Normalizes the TTL into a duration relative to `now`.
    ///
    /// # Errors
    /// - [`CacheError::ZeroTtl`] if a relative TTL is zero
    /// - [`CacheError::ElapsedDeadline`] if an absolute deadline is not
    ///   strictly in the future
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<Duration> {
        match *self {
            Ttl::Relative(duration) => {
                if duration.is_zero() {
                    return Err(CacheError::ZeroTtl(duration));
                }
                Ok(duration)
            }
            Ttl::Absolute(deadline) => (deadline - now)
                .to_std()
                .ok()
                .filter(|remaining| !remaining.is_zero())
                .ok_or(CacheError::ElapsedDeadline(deadline)),
        }
    }

    /// Convenience constructor for a relative TTL in whole seconds.
    pub fn seconds(secs: u64) -> Self {
        Ttl::Relative(Duration::from_secs(secs))
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl::Relative(duration)
    }
}

impl From<DateTime<Utc>> for Ttl {
    fn from(deadline: DateTime<Utc>) -> Self {
        Ttl::Absolute(deadline)
    }
}

/// Plain integer seconds, the shorthand most call sites use.
impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Ttl::seconds(secs)
    }
}
