//! Timed Cache - an in-memory key/value store with per-key expiry timers
//!
//! Built for request memoization in front of rate-limited third-party APIs:
//! callers derive a key from the logical request, `get` before doing the
//! expensive work, and `set` afterwards. Entries delete themselves once
//! their TTL elapses; rewriting a key restarts its clock.

pub mod cache;
pub mod error;
pub mod key;
pub mod ttl;

pub use cache::{CacheEntry, CacheStats, TimedCache, DEFAULT_TTL};
pub use error::{CacheError, Result};
pub use key::RequestKey;
pub use ttl::Ttl;
