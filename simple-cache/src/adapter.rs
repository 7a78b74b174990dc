use crate::ports::CacheStore;
use crate::validation::{validate_key, validate_keys};
use shared::{Capability, Error, Result, TtlMs};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

/// Exposes a [`CacheStore`] through the simple get/set/delete/clear/has surface.
///
/// Every key argument is checked against the reserved character set before the
/// call reaches the store. Storage, expiry and eviction stay with the store.
#[derive(Clone)]
pub struct SimpleCacheAdapter<V>
where
    V: Clone + Send + Sync + 'static,
{
    store: Arc<dyn CacheStore<V>>,
}

impl<V> SimpleCacheAdapter<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Wraps `store`, failing if it lacks bulk clear, bulk fetch or bulk save.
    pub fn new(store: Arc<dyn CacheStore<V>>) -> Result<Self> {
        if let Some(capability) = Capability::REQUIRED
            .into_iter()
            .find(|capability| !store.supports(*capability))
        {
            warn!(
                "Rejecting cache store '{}': missing {} capability",
                store.name(),
                capability
            );
            return Err(Error::MissingCapability {
                store: store.name().to_string(),
                capability,
            });
        }

        debug!("Wrapping cache store '{}'", store.name());
        Ok(Self { store })
    }

    pub fn from_store<S>(store: S) -> Result<Self>
    where
        S: CacheStore<V>,
    {
        Self::new(Arc::new(store))
    }

    pub fn store(&self) -> &Arc<dyn CacheStore<V>> {
        &self.store
    }

    /// Returns the cached value, or `default` when the key is absent.
    pub async fn get(&self, key: &str, default: Option<V>) -> Result<Option<V>> {
        validate_key(key)?;
        debug!("get '{}' from '{}'", key, self.store.name());

        Ok(self.store.fetch(key).await?.or(default))
    }

    pub async fn set(&self, key: &str, value: V, ttl: Option<TtlMs>) -> Result<bool> {
        validate_key(key)?;
        debug!("set '{}' in '{}' (ttl: {:?})", key, self.store.name(), ttl);

        self.store.save(key, value, ttl).await
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        debug!("delete '{}' from '{}'", key, self.store.name());

        self.store.delete(key).await
    }

    pub async fn has(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        debug!("has '{}' in '{}'", key, self.store.name());

        self.store.contains(key).await
    }

    /// Removes every entry from the wrapped store.
    pub async fn clear(&self) -> Result<bool> {
        debug!("clear '{}'", self.store.name());
        self.store.delete_all().await
    }

    /// Looks up several keys at once.
    ///
    /// The returned map holds one entry per requested key; absent keys map to
    /// `default`.
    pub async fn get_multiple<I, K>(
        &self,
        keys: I,
        default: Option<V>,
    ) -> Result<HashMap<String, Option<V>>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        validate_keys(&keys)?;
        debug!("get {} key(s) from '{}'", keys.len(), self.store.name());

        let found = self.store.fetch_multiple(&keys).await?;

        Ok(keys
            .into_iter()
            .map(|key| {
                let value = found.get(&key).cloned().or_else(|| default.clone());
                (key, value)
            })
            .collect())
    }

    pub async fn set_multiple<I, K>(&self, entries: I, ttl: Option<TtlMs>) -> Result<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let entries: Vec<(String, V)> = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        validate_keys(entries.iter().map(|(key, _)| key))?;
        debug!(
            "set {} key(s) in '{}' (ttl: {:?})",
            entries.len(),
            self.store.name(),
            ttl
        );

        self.store.save_multiple(entries, ttl).await
    }

    /// Deletes every key, even after a failed deletion.
    ///
    /// All keys are validated before anything is deleted. Returns `true` only
    /// when every individual deletion succeeded; a store error on one key
    /// counts as a failure for that key.
    pub async fn delete_multiple<I, K>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        validate_keys(&keys)?;

        let mut success = true;
        for key in &keys {
            match self.store.delete(key).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!("Failed to delete '{}' from '{}'", key, self.store.name());
                    success = false;
                }
                Err(e) => {
                    warn!(
                        "Error deleting '{}' from '{}': {}",
                        key,
                        self.store.name(),
                        e
                    );
                    success = false;
                }
            }
        }

        Ok(success)
    }
}

impl<V> Debug for SimpleCacheAdapter<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleCacheAdapter")
            .field("store", &self.store.name())
            .finish()
    }
}
