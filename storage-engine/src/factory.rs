use crate::foyer_cache::FoyerCache;
use crate::moka_cache::MokaCache;
use shared::config::{BackendKind, StoreConfig};
use simple_cache::ports::{CacheStore, StorageFactory};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// foyer needs a bound; used when the config sets none
const DEFAULT_FOYER_ENTRIES: usize = 10_000;

/// Builds the cache store named by [`StoreConfig::backend`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineFactory;

impl<V> StorageFactory<V> for EngineFactory
where
    V: Clone + Send + Sync + 'static,
{
    fn create_from_config(&self, config: &StoreConfig) -> Arc<dyn CacheStore<V>> {
        let default_ttl = config.default_ttl_ms.map(Duration::from_millis);

        match config.backend {
            BackendKind::Moka => {
                info!(
                    "Creating moka cache '{}' (max entries: {:?}, default ttl: {:?})",
                    config.name, config.max_entries, default_ttl
                );
                Arc::new(MokaCache::new(
                    config.name.clone(),
                    config.max_entries,
                    default_ttl,
                ))
            }
            BackendKind::Foyer => {
                let max_entries = config
                    .max_entries
                    .map_or(DEFAULT_FOYER_ENTRIES, |n| n as usize);
                info!(
                    "Creating foyer cache '{}' (max entries: {})",
                    config.name, max_entries
                );
                Arc::new(FoyerCache::new(config.name.clone(), max_entries))
            }
        }
    }
}
