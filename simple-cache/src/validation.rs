use regex::Regex;
use shared::{Error, Result};
use std::sync::LazyLock;

// Characters reserved by the cache interface: { } ( ) / @
static RESERVED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[{}()/@]").expect("reserved character pattern is valid"));

/// Rejects a key containing any reserved character.
pub fn validate_key(key: &str) -> Result<()> {
    if RESERVED_CHARS.is_match(key) {
        return Err(Error::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Validates every key, stopping at the first invalid one.
pub fn validate_keys<I, K>(keys: I) -> Result<()>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    keys.into_iter().try_for_each(|key| validate_key(key.as_ref()))
}
