// src/core/cache.rs
//! In-memory response cache with per-entry expiry.
//!
//! Entries are checked lazily: an expired entry is dropped by the read that
//! finds it, there is no background sweep. The cache is process-local and an
//! explicit instance is handed to whoever needs it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when advanced. Lets tests step past a TTL without sleeping.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let delta = chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::days(36_500));
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub payload: V,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// An entry is live iff `now - created_at < ttl`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.age(now) < self.ttl
    }

    fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).to_std().unwrap_or(Duration::ZERO)
    }

    fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.ttl.saturating_sub(self.age(now))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryStats {
    pub ttl_secs: u64,
    pub remaining_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    /// Live entries only.
    pub entries: BTreeMap<String, EntryStats>,
}

pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    // A poisoned lock only means another request panicked mid-insert; the map is still usable.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the payload for `key` if a live entry exists, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries();

        let entry = entries.get(key)?;
        if entry.is_live(now) {
            debug!(key = %key, "Cache hit");
            return Some(entry.payload.clone());
        }

        entries.remove(key);
        debug!(key = %key, "Evicted expired cache entry");
        None
    }

    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let entry = CacheEntry {
            key: key.clone(),
            payload: value,
            created_at: self.clock.now(),
            ttl,
        };

        self.entries().insert(key.clone(), entry);
        debug!(key = %key, ttl_secs = ttl.as_secs(), "Stored cache entry");
    }

    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries().remove(key).is_some();
        if removed {
            info!(key = %key, "Invalidated cache entry");
        }
        removed
    }

    /// Drop every entry whose key starts with `prefix`. Returns how many were removed.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();

        info!(prefix = %prefix, removed, "Invalidated cache entries by prefix");
        removed
    }

    pub fn clear(&self) -> usize {
        let mut entries = self.entries();
        let removed = entries.len();
        entries.clear();

        info!(removed, "Cleared cache");
        removed
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries();

        let mut stats = CacheStats {
            total: entries.len(),
            active: 0,
            expired: 0,
            entries: BTreeMap::new(),
        };

        for entry in entries.values() {
            if entry.is_live(now) {
                stats.active += 1;
                stats.entries.insert(
                    entry.key.clone(),
                    EntryStats {
                        ttl_secs: entry.ttl.as_secs(),
                        remaining_secs: entry.remaining(now).as_secs(),
                    },
                );
            } else {
                stats.expired += 1;
            }
        }

        stats
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a cache key as `namespace:<canonical JSON of params>`.
///
/// Object keys are sorted at every depth, so two parameter maps that differ
/// only in insertion order produce the same key.
pub fn cache_key<P: Serialize + ?Sized>(namespace: &str, params: &P) -> Result<String, serde_json::Error> {
    let value = canonicalize(serde_json::to_value(params)?);
    Ok(format!("{}:{}", namespace, value))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect();
            Value::Object(sorted.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// An async function memoised through a [`TtlCache`]. Built by [`with_cache`].
pub struct CachedCall<V, F> {
    cache: Arc<TtlCache<V>>,
    namespace: String,
    ttl: Duration,
    func: F,
}

/// Wrap `func` so that calls with equal parameters within `ttl` reuse the first result.
///
/// Only successful results are stored.
pub fn with_cache<V, F>(
    cache: Arc<TtlCache<V>>,
    namespace: impl Into<String>,
    ttl: Duration,
    func: F,
) -> CachedCall<V, F> {
    CachedCall {
        cache,
        namespace: namespace.into(),
        ttl,
        func,
    }
}

impl<V: Clone, F> CachedCall<V, F> {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub async fn call<P, Fut, E>(&self, params: P) -> Result<V, E>
    where
        P: Serialize,
        F: Fn(P) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let key = match cache_key(&self.namespace, &params) {
            Ok(key) => key,
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "Parameters not serializable, bypassing cache");
                return (self.func)(params).await;
            }
        };

        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let value = (self.func)(params).await?;
        self.cache.set(key, value.clone(), self.ttl);
        Ok(value)
    }
}
