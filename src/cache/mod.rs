//! Cache Module
//!
//! Provides the in-memory timed cache: entries expire on per-key timers,
//! and writing to an existing key restarts its expiration clock.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TimedCache;

pub(crate) use stats::StatsRecorder;

// == Public Constants ==
/// Default TTL applied when a cache is built without a usable one.
pub const DEFAULT_TTL: std::time::Duration = std::time::Duration::from_secs(600);
