//! Keyed TTL cache with an injectable clock.
//!
//! [`Cache`] is the seam the record source caches through. [`MemoryCache`]
//! is the in-process implementation; it reads time from a [`Clock`] so tests
//! can step past a TTL with [`ManualClock`] instead of sleeping.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use almanac_core::cache::{Cache, ManualClock, MemoryCache};
//!
//! let clock = Arc::new(ManualClock::new());
//! let cache: MemoryCache<u32> = MemoryCache::with_clock(clock.clone());
//!
//! cache.set("answer", 42, Duration::from_secs(60));
//! assert_eq!(cache.get("answer"), Some(42));
//!
//! clock.advance(Duration::from_secs(61));
//! assert_eq!(cache.get("answer"), None);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

// ============================================================================
// Clock
// ============================================================================

/// Source of the current instant.
pub trait Clock: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.origin + offset
    }
}

// ============================================================================
// Cache
// ============================================================================

/// A keyed store of values that expire after a TTL.
pub trait Cache<V>: Send + Sync {
    /// Fetch a live value. Expired values are absent.
    fn get(&self, key: &str) -> Option<V>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: V, ttl: Duration);

    /// Drop the value under `key`, if any.
    fn invalidate(&self, key: &str);
}

struct Entry<V> {
    value: V,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// In-process [`Cache`] guarded by an `RwLock`.
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V> MemoryCache<V> {
    /// Create an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().ok()?;
            let entry = entries.get(key)?;
            if entry.is_live(now) {
                return Some(entry.value.clone());
            }
        }

        tracing::debug!(key, "cache entry expired");
        if let Ok(mut entries) = self.entries.write() {
            if entries.get(key).is_some_and(|e| !e.is_live(now)) {
                entries.remove(key);
            }
        }
        None
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = self.clock.now().checked_add(ttl);
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), Entry { value, expires_at });
            }
            Err(e) => tracing::warn!(key, "cache lock poisoned, value not stored: {e}"),
        }
    }

    fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}
