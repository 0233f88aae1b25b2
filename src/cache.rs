//! Multi-aspect result cache.
//!
//! Decoded entities are memoized under `"<Class>-<aspect>-<value>"` keys so a
//! host fetched by id is also found by name. Entries expire passively after
//! the configured TTL; there is no invalidation beyond that.

use crate::error::{DeepSecurityError, Result};
use crate::mapping::{SchemaRegistry, Value};
use crate::transport::TransportObject;
use moka::sync::Cache;
use std::any::Any;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Entry = Arc<dyn Any + Send + Sync>;

/// Default TTL of cached entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Default maximum number of cached entries.
pub const DEFAULT_CAPACITY: u64 = 10_000;

/// Build the cache key of `value` under `aspect` for `class`.
///
/// ```
/// use deepsecurity::cache::cache_key;
///
/// assert_eq!(cache_key("HostGroup", "id", 42), "HostGroup-id-42");
/// assert_ne!(cache_key("HostGroup", "id", 42), cache_key("Host", "id", 42));
/// ```
pub fn cache_key(class: &str, aspect: &str, value: impl Display) -> String {
    format!("{class}-{aspect}-{value}")
}

/// Hit and miss counters of a [`ResultCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// Process-wide cache of decoded entities, bounded by capacity and TTL.
pub struct ResultCache {
    cache: Cache<String, Entry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` entries for `ttl` each.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the value cached under `key`, or compute and store it.
    ///
    /// `compute` runs without any lock held, so it may itself write to the
    /// cache. A failed computation stores nothing.
    pub fn fetch<T, F>(&self, key: &str, compute: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<T>,
    {
        if let Some(entry) = self.cache.get(key) {
            let value = entry.downcast_ref::<T>().ok_or_else(|| {
                DeepSecurityError::cache(format!(
                    "entry {key} does not hold a {}",
                    std::any::type_name::<T>()
                ))
            })?;
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Cache hit for {}", key);
            return Ok(value.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Cache miss for {}", key);
        let value = compute()?;
        self.cache.insert(key.to_string(), Arc::new(value.clone()));
        Ok(value)
    }

    /// Look up a cached value without computing it.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<T> {
        self.cache
            .get(key)
            .and_then(|entry| entry.downcast_ref::<T>().cloned())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn insert<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
        self.cache.insert(key.into(), Arc::new(value));
    }

    /// Store an entity under every cache aspect its class declares.
    ///
    /// Aspects whose field is unset are skipped, as are classes without
    /// aspects. Entries under other aspects are left untouched.
    pub fn store_under_all_aspects<T: TransportObject>(
        &self,
        registry: &SchemaRegistry,
        entity: &T,
    ) -> Result<()> {
        let schema = registry.schema(T::CLASS)?;
        for aspect in schema.cache_aspects() {
            let Some(value) = entity.record().get(aspect) else {
                continue;
            };
            let key = match value {
                Value::Integer(id) => cache_key(T::CLASS, aspect, id),
                Value::String(text) => cache_key(T::CLASS, aspect, text),
                other => {
                    return Err(DeepSecurityError::cache(format!(
                        "cannot key {} by {} of type {}",
                        T::CLASS,
                        aspect,
                        other.kind()
                    )))
                }
            };
            self.cache.insert(key, Arc::new(entity.clone()));
        }
        Ok(())
    }

    /// Counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}
