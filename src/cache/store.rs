//! Cache Store Module
//!
//! The timed cache engine: a HashMap in which every entry is guarded by its
//! own expiry task, armed at insertion and defused on overwrite or removal.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::cache::{CacheEntry, CacheStats, StatsRecorder, DEFAULT_TTL};
use crate::error::{CacheError, Result};
use crate::ttl::Ttl;

// == Shared State ==
/// State shared between cache handles and armed expiry tasks.
struct Inner<K, V> {
    /// Key-value storage, each entry carrying its armed expiry task
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    /// Activity counters
    stats: StatsRecorder,
    /// Arming token source; each `set` stamps its entry with a fresh value
    generation: AtomicU64,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
}

impl<K, V> Inner<K, V> {
    /// Locks the entry map, recovering the guard if a holder panicked.
    fn entries(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// == Timed Cache ==
/// A key/value store whose entries delete themselves once their TTL elapses.
///
/// Every `set` arms one expiry task for the written key. Overwriting a key
/// defuses the previous task before the new entry is installed, so the
/// expiration clock restarts from the new TTL and a stale timer can never
/// delete a freshly written value. Reads never touch the timer; refresh
/// happens only on write.
///
/// The handle is cheap to clone and all clones share one store. `get`, `set`
/// and `remove` are synchronous and non-blocking; only the expiry tasks
/// suspend. Must be used from within a Tokio runtime.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use timed_cache::TimedCache;
///
/// #[tokio::main]
/// async fn main() -> timed_cache::Result<()> {
///     let cache: TimedCache<String, String> = TimedCache::new(Duration::from_secs(600));
///
///     cache.set("weather:paris".into(), "13C, clear".into(), None)?;
///     assert_eq!(cache.get("weather:paris").as_deref(), Some("13C, clear"));
///     Ok(())
/// }
/// ```
pub struct TimedCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for TimedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates an empty cache with the given default TTL.
    ///
    /// A zero duration would make every default-TTL entry dead on arrival,
    /// so it is replaced by [`DEFAULT_TTL`] with a warning rather than
    /// accepted as "never expire". Negative durations are unrepresentable.
    pub fn new(default_ttl: Duration) -> Self {
        let default_ttl = if default_ttl.is_zero() {
            warn!(
                fallback = ?DEFAULT_TTL,
                "zero default TTL requested, using fallback"
            );
            DEFAULT_TTL
        } else {
            default_ttl
        };

        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                stats: StatsRecorder::default(),
                generation: AtomicU64::new(0),
                default_ttl,
            }),
        }
    }

    // == Set ==
    /// Stores a key-value pair with the given TTL, or the default TTL when
    /// `ttl` is `None`.
    ///
    /// If the key already holds a live entry, that entry's expiry task is
    /// defused before the new entry is installed; overwriting is the normal
    /// refresh path, never an error. Returns the stored value so a call can
    /// double as the expression whose result the caller uses immediately.
    ///
    /// # Errors
    /// - [`CacheError::ZeroTtl`] for an explicit zero TTL
    /// - [`CacheError::ElapsedDeadline`] for an absolute deadline that is
    ///   not in the future
    pub fn set(&self, key: K, value: V, ttl: Option<Ttl>) -> Result<V> {
        let now = Utc::now();
        let ttl = ttl.unwrap_or(Ttl::Relative(self.inner.default_ttl));
        let delay = ttl.resolve(now)?;

        let mut entries = self.inner.entries();

        // Defuse the old timer before installing the new entry; a timer that
        // already woke is stopped by the generation check in the expiry task.
        if let Some(old) = entries.remove(&key) {
            old.defuse();
            self.inner.stats.record_refresh();
            trace!(ttl = ?delay, "entry refreshed, timer restarted");
        } else {
            self.inner.stats.record_insertion();
            trace!(ttl = ?delay, "entry inserted");
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
        let expiry = Self::arm_expiry(&self.inner, key.clone(), delay, generation);
        entries.insert(key, CacheEntry::new(value.clone(), now, delay, generation, expiry));

        Ok(value)
    }

    // == Get ==
    /// Returns a clone of the live value for `key`, or `None`.
    ///
    /// Never resets the entry's timer. An entry whose wall-clock deadline has
    /// passed but whose timer has not yet fired is reaped here and counted as
    /// a miss.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut entries = self.inner.entries();

        let live = match entries.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            // Timer lag: the deadline passed before the task woke up
            Some(_) => None,
            None => {
                self.inner.stats.record_miss();
                return None;
            }
        };

        match live {
            Some(value) => {
                self.inner.stats.record_hit();
                Some(value)
            }
            None => {
                if let Some(entry) = entries.remove(key) {
                    entry.defuse();
                }
                self.inner.stats.record_expiration();
                self.inner.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Defuses the expiry task for `key` and removes the entry, returning its
    /// value. Removing an absent key is a no-op returning `None`.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.inner.entries().remove(key)?;
        entry.defuse();
        self.inner.stats.record_removal();
        trace!("entry removed");
        Some(entry.value)
    }

    // == Take ==
    /// Strict variant of [`remove`](Self::remove): fails with
    /// [`CacheError::NotFound`] when the key is absent.
    pub fn take<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Display + ?Sized,
    {
        self.remove(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    // == Clear ==
    /// Defuses every armed expiry task and empties the cache.
    ///
    /// Intended for shutdown, so no cancelled timer outlives the store.
    pub fn clear(&self) {
        let mut entries = self.inner.entries();
        let drained = entries.len();

        for (_, entry) in entries.drain() {
            entry.defuse();
            self.inner.stats.record_removal();
        }

        debug!(entries = drained, "cache cleared");
    }

    // == Membership ==
    /// Whether a live entry exists for `key`. Does not count as a read.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.entries().contains_key(key)
    }

    // == Keys ==
    /// Snapshot of the currently live keys, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.inner.entries().keys().cloned().collect()
    }

    // == Length ==
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.entries().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.entries().is_empty()
    }

    // == Stats ==
    /// Snapshot of the activity counters.
    pub fn stats(&self) -> CacheStats {
        let live_entries = self.len();
        self.inner.stats.snapshot(live_entries)
    }

    /// The TTL applied when `set` is called without one.
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    // == Expiry Task ==
    /// Arms the expiry task for `key`: sleep for `delay`, then pop the entry,
    /// provided the entry present still carries this task's generation.
    ///
    /// The generation check is load-bearing: `set` defuses the old task
    /// before overwriting, but an abort only lands at a yield point, and a
    /// task that has already woken has none left. Without the check such a
    /// task would delete the entry the overwrite just installed. The task
    /// holds a `Weak` reference so a dropped cache is not kept alive by its
    /// own timers; a late firing then degrades to a no-op.
    fn arm_expiry(
        inner: &Arc<Inner<K, V>>,
        key: K,
        delay: Duration,
        generation: u64,
    ) -> JoinHandle<()> {
        let weak = Arc::downgrade(inner);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(inner) = Weak::upgrade(&weak) else {
                return;
            };

            let mut entries = inner.entries();
            let armed_by_us = entries
                .get(&key)
                .is_some_and(|entry| entry.generation == generation);

            if armed_by_us {
                entries.remove(&key);
                inner.stats.record_expiration();
                trace!(ttl = ?delay, "entry expired");
            }
        })
    }
}

impl<K, V> Default for TimedCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// An empty cache with [`DEFAULT_TTL`] as the default TTL.
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

// == Debug Implementation ==
/// Reports the remaining time-to-expiry per key, for observability.
impl<K: fmt::Debug, V> fmt::Debug for TimedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.inner.entries();
        let mut map = f.debug_map();
        for (key, entry) in entries.iter() {
            map.entry(key, &format_args!("expires in {:?}", entry.ttl_remaining()));
        }
        map.finish()
    }
}
