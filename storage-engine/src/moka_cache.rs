use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use shared::{Capability, Result, TtlMs};
use simple_cache::ports::CacheStore;
use std::collections::HashMap;
use std::fmt::Debug;
use std::time::{Duration, Instant};

#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Option<Duration>,
}

/// Expires each entry after its own TTL, falling back to the cache-wide default
struct EntryExpiry {
    default_ttl: Option<Duration>,
}

impl<V> Expiry<String, Entry<V>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl.or(self.default_ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // A rewrite resets the clock with the TTL of the new write
        entry.ttl.or(self.default_ttl)
    }
}

/// Moka-based cache implementation with per-entry TTL support
/// Provides lock-free, concurrent cache with optional size bounds
pub struct MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    name: String,
    cache: Cache<String, Entry<V>>,
}

impl<V> MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new unbounded Moka cache with optional default TTL
    pub fn new_unbounded(default_ttl: Option<Duration>) -> Self {
        Self::new("moka".to_string(), None, default_ttl)
    }

    /// Create a new bounded Moka cache with max entries and optional default TTL
    pub fn new_bounded(max_entries: u64, default_ttl: Option<Duration>) -> Self {
        Self::new("moka".to_string(), Some(max_entries), default_ttl)
    }

    /// Create a Moka cache from name and optional capacity
    /// Used by the storage factory
    pub fn new(name: String, max_entries: Option<u64>, default_ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder()
            .name(&name)
            .expire_after(EntryExpiry { default_ttl });

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            name,
            cache: builder.build(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Flush moka's pending maintenance (evictions, expirations).
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl<V> CacheStore<V> for MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, key: &str) -> Result<Option<V>> {
        // None when the key doesn't exist or its TTL expired
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn save(&self, key: &str, value: V, ttl: Option<TtlMs>) -> Result<bool> {
        let entry = Entry {
            value,
            ttl: ttl.map(TtlMs::as_duration),
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        // Removing an absent key still leaves the cache in the requested state
        self.cache.remove(key).await;
        Ok(true)
    }

    fn supports(&self, capability: Capability) -> bool {
        matches!(
            capability,
            Capability::Clear | Capability::MultiGet | Capability::MultiPut
        )
    }

    async fn delete_all(&self) -> Result<bool> {
        self.cache.invalidate_all();
        Ok(true)
    }

    async fn fetch_multiple(&self, keys: &[String]) -> Result<HashMap<String, V>> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(entry) = self.cache.get(key).await {
                found.insert(key.clone(), entry.value);
            }
        }
        Ok(found)
    }

    async fn save_multiple(&self, entries: Vec<(String, V)>, ttl: Option<TtlMs>) -> Result<bool> {
        let ttl = ttl.map(TtlMs::as_duration);
        for (key, value) in entries {
            self.cache.insert(key, Entry { value, ttl }).await;
        }
        Ok(true)
    }
}

impl<V> Debug for MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("name", &self.name)
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}
