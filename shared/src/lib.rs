// shared/src/lib.rs

use std::fmt;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("The given cache key \"{0}\" contains at least one unsupported character")]
    InvalidKey(String),
    #[error("cache store \"{store}\" does not support {capability}")]
    MissingCapability {
        store: String,
        capability: Capability,
    },
    #[error("operation requires {0}, which the cache store does not provide")]
    Unsupported(Capability),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlMs(pub u64);

impl TtlMs {
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl From<Duration> for TtlMs {
    fn from(duration: Duration) -> Self {
        TtlMs(duration.as_millis().min(u64::MAX as u128) as u64)
    }
}

/// Bulk operations a cache store must provide to be wrapped by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Clear,
    MultiGet,
    MultiPut,
}

impl Capability {
    /// Every required capability, in the order they are checked.
    pub const REQUIRED: [Capability; 3] =
        [Capability::Clear, Capability::MultiGet, Capability::MultiPut];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Clear => "bulk clear",
            Capability::MultiGet => "bulk fetch",
            Capability::MultiPut => "bulk save",
        };
        f.write_str(name)
    }
}

pub mod config;
