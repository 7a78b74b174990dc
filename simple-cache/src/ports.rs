#![deny(clippy::all)]

use async_trait::async_trait;
use shared::config::StoreConfig;
use shared::{Capability, Error, Result, TtlMs};
use std::collections::HashMap;
use std::sync::Arc;

// Ports are the pluggable extension points for underlying cache implementations

/// Port for creating cache storage from configuration
/// This allows different storage backends to be plugged in
pub trait StorageFactory<V: Send + Sync + 'static>: Send + Sync + 'static {
    /// Create a new cache store from configuration
    fn create_from_config(&self, config: &StoreConfig) -> Arc<dyn CacheStore<V>>;
}

/// Port for a key-value cache backend.
///
/// The single-key operations are mandatory. The bulk operations are optional
/// capabilities: a store advertises each one through [`CacheStore::supports`]
/// and overrides the matching method. Un-overridden bulk methods fail with
/// [`Error::Unsupported`].
#[async_trait]
pub trait CacheStore<V: Send + Sync + 'static>: Send + Sync + 'static {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &str;

    async fn fetch(&self, key: &str) -> Result<Option<V>>;
    async fn contains(&self, key: &str) -> Result<bool>;
    async fn save(&self, key: &str, value: V, ttl: Option<TtlMs>) -> Result<bool>;
    async fn delete(&self, key: &str) -> Result<bool>;

    fn supports(&self, _capability: Capability) -> bool {
        false
    }

    /// Remove every entry.
    async fn delete_all(&self) -> Result<bool> {
        Err(Error::Unsupported(Capability::Clear))
    }

    /// Fetch several keys at once. Keys that are absent are left out of the result.
    async fn fetch_multiple(&self, _keys: &[String]) -> Result<HashMap<String, V>> {
        Err(Error::Unsupported(Capability::MultiGet))
    }

    async fn save_multiple(&self, _entries: Vec<(String, V)>, _ttl: Option<TtlMs>) -> Result<bool> {
        Err(Error::Unsupported(Capability::MultiPut))
    }
}
