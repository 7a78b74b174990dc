//! Cache stores backing the simple cache adapter.

pub mod factory;
pub mod foyer_cache;
pub mod moka_cache;

pub use factory::EngineFactory;
pub use foyer_cache::FoyerCache;
pub use moka_cache::MokaCache;
