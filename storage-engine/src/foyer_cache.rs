use async_trait::async_trait;
use foyer::{Cache, CacheBuilder};
use shared::{Capability, Result, TtlMs};
use simple_cache::ports::CacheStore;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Foyer-based in-memory cache implementation
///
/// Capacity is an entry count: every entry weighs 1 whatever the size of its
/// value. Foyer has no per-entry expiry, so TTLs are accepted and ignored.
pub struct FoyerCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    name: String,
    cache: Arc<Cache<String, V>>,
}

impl<V> FoyerCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new Foyer in-memory cache holding at most `max_entries` entries
    pub fn new(name: String, max_entries: usize) -> Self {
        // One shard keeps the bound exact; foyer splits capacity across shards
        let cache = CacheBuilder::new(max_entries)
            .with_name(name.clone())
            .with_shards(1)
            .with_weighter(|_key: &String, _value: &V| 1)
            .build();

        Self {
            name,
            cache: Arc::new(cache),
        }
    }

    /// Number of entries currently held.
    pub fn usage(&self) -> usize {
        self.cache.usage()
    }

    fn note_ignored_ttl(&self, ttl: Option<TtlMs>) {
        if let Some(ttl) = ttl {
            debug!(
                "Foyer cache '{}' ignores per-entry TTL of {}ms",
                self.name, ttl.0
            );
        }
    }
}

#[async_trait]
impl<V> CacheStore<V> for FoyerCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, key: &str) -> Result<Option<V>> {
        Ok(self.cache.get(key).map(|entry| entry.value().clone()))
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.cache.contains(key))
    }

    async fn save(&self, key: &str, value: V, ttl: Option<TtlMs>) -> Result<bool> {
        self.note_ignored_ttl(ttl);
        self.cache.insert(key.to_string(), value);
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.cache.remove(key);
        Ok(true)
    }

    fn supports(&self, capability: Capability) -> bool {
        matches!(
            capability,
            Capability::Clear | Capability::MultiGet | Capability::MultiPut
        )
    }

    async fn delete_all(&self) -> Result<bool> {
        self.cache.clear();
        Ok(true)
    }

    async fn fetch_multiple(&self, keys: &[String]) -> Result<HashMap<String, V>> {
        Ok(keys
            .iter()
            .filter_map(|key| {
                self.cache
                    .get(key)
                    .map(|entry| (key.clone(), entry.value().clone()))
            })
            .collect())
    }

    async fn save_multiple(&self, entries: Vec<(String, V)>, ttl: Option<TtlMs>) -> Result<bool> {
        self.note_ignored_ttl(ttl);
        for (key, value) in entries {
            self.cache.insert(key, value);
        }
        Ok(true)
    }
}

impl<V> Debug for FoyerCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoyerCache")
            .field("name", &self.name)
            .field("cache", &"<foyer::Cache>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPACITY: usize = 1024;

    #[tokio::test]
    async fn test_foyer_cache_save_and_fetch() {
        let cache = FoyerCache::new("test".to_string(), CAPACITY);

        assert!(cache.save("hello", "world", None).await.unwrap());

        assert_eq!(cache.fetch("hello").await.unwrap(), Some("world"));
        assert!(cache.contains("hello").await.unwrap());
    }

    #[tokio::test]
    async fn test_foyer_cache_delete() {
        let cache = FoyerCache::new("test".to_string(), CAPACITY);

        cache.save("test_key", "test_value", None).await.unwrap();
        assert!(cache.delete("test_key").await.unwrap());

        assert_eq!(cache.fetch("test_key").await.unwrap(), None);
        assert!(!cache.contains("test_key").await.unwrap());
    }

    #[tokio::test]
    async fn test_foyer_cache_fetch_nonexistent() {
        let cache: FoyerCache<&str> = FoyerCache::new("test".to_string(), CAPACITY);
        assert_eq!(cache.fetch("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_foyer_cache_overwrite() {
        let cache = FoyerCache::new("test".to_string(), CAPACITY);

        cache.save("key", "value1", None).await.unwrap();
        cache.save("key", "value2", None).await.unwrap();

        assert_eq!(cache.fetch("key").await.unwrap(), Some("value2"));
    }

    #[tokio::test]
    async fn test_foyer_cache_accepts_ttl() {
        let cache = FoyerCache::new("test".to_string(), CAPACITY);

        assert!(cache.save("ttl_key", "ttl_value", Some(TtlMs(5000))).await.unwrap());
        assert_eq!(cache.fetch("ttl_key").await.unwrap(), Some("ttl_value"));
    }

    #[tokio::test]
    async fn test_foyer_cache_bulk_operations() {
        let cache = FoyerCache::new("test".to_string(), CAPACITY);

        let entries = vec![("a".to_string(), 1u32), ("b".to_string(), 2u32)];
        assert!(cache.save_multiple(entries, Some(TtlMs(10))).await.unwrap());

        let keys = vec!["a".to_string(), "missing".to_string()];
        let found = cache.fetch_multiple(&keys).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found["a"], 1);

        assert!(cache.delete_all().await.unwrap());
        assert!(!cache.contains("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_foyer_cache_counts_entries_not_bytes() {
        let cache = FoyerCache::new("test".to_string(), 4);

        cache.save("big", "x".repeat(100_000), None).await.unwrap();
        assert_eq!(cache.usage(), 1);
        assert_eq!(cache.fetch("big").await.unwrap().map(|v| v.len()), Some(100_000));
    }

    #[tokio::test]
    async fn test_foyer_cache_holds_at_most_capacity() {
        let cache = FoyerCache::new("test".to_string(), 2);

        for i in 0..5 {
            let key = format!("key{}", i);
            cache.save(&key, i, None).await.unwrap();
        }

        assert!(cache.usage() <= 2, "cache should hold at most 2 entries");
        let mut present = 0;
        for i in 0..5 {
            if cache.contains(&format!("key{}", i)).await.unwrap() {
                present += 1;
            }
        }
        assert!(present <= 2);
    }
}
