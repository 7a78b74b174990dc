//! Simple cache-access surface over pluggable key-value cache stores.

pub mod adapter;
pub mod ports;
pub mod validation;

pub use adapter::SimpleCacheAdapter;
pub use ports::{CacheStore, StorageFactory};
pub use shared::{Capability, Error, Result, TtlMs};
