use crate::{Error, Result};
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Moka,  // in-memory, per-entry TTL
    Foyer, // in-memory, TTL ignored
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "moka" => Ok(BackendKind::Moka),
            "foyer" => Ok(BackendKind::Foyer),
            other => Err(Error::Config(format!(
                "unknown backend '{}'. Must be 'moka' or 'foyer'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub name: String,
    pub backend: BackendKind,
    pub max_entries: Option<u64>,    // None = unbounded for moka, engine default for foyer
    pub default_ttl_ms: Option<u64>, // applied when a write carries no TTL
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            backend: BackendKind::Moka,
            max_entries: None,
            default_ttl_ms: None,
        }
    }
}

impl StoreConfig {
    const DEFAULT_NAME: &str = "default";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`], after loading a `.env` file if one exists.
    pub fn from_dotenv() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment variables from {}", path.display()),
            Err(_) => info!("No .env file found, using system environment variables"),
        }
        Self::from_env()
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("SIMPLE_CACHE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => BackendKind::Moka,
        };

        let default_ttl_ms = parse_or(&lookup, "SIMPLE_CACHE_DEFAULT_TTL_MS", 0u64);

        Ok(Self {
            name: lookup("SIMPLE_CACHE_NAME").unwrap_or_else(|| Self::DEFAULT_NAME.to_string()),
            backend,
            max_entries: lookup("SIMPLE_CACHE_MAX_ENTRIES")
                .and_then(|raw| parse_logged::<u64>("SIMPLE_CACHE_MAX_ENTRIES", &raw)),
            // 0 = no default TTL
            default_ttl_ms: (default_ttl_ms > 0).then_some(default_ttl_ms),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .and_then(|raw| parse_logged(name, &raw))
        .unwrap_or(default)
}

fn parse_logged<T: FromStr>(name: &str, raw: &str) -> Option<T> {
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{} has invalid value '{}', using default", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.name, "default");
        assert_eq!(config.backend, BackendKind::Moka);
        assert_eq!(config.max_entries, None);
        assert_eq!(config.default_ttl_ms, None);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("SIMPLE_CACHE_NAME", "sessions"),
            ("SIMPLE_CACHE_BACKEND", "Foyer"),
            ("SIMPLE_CACHE_MAX_ENTRIES", "500"),
            ("SIMPLE_CACHE_DEFAULT_TTL_MS", "30000"),
        ]))
        .unwrap();

        assert_eq!(config.name, "sessions");
        assert_eq!(config.backend, BackendKind::Foyer);
        assert_eq!(config.max_entries, Some(500));
        assert_eq!(config.default_ttl_ms, Some(30_000));
    }

    #[test]
    fn test_zero_ttl_means_none() {
        let config =
            StoreConfig::from_lookup(lookup_from(&[("SIMPLE_CACHE_DEFAULT_TTL_MS", "0")])).unwrap();
        assert_eq!(config.default_ttl_ms, None);
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("SIMPLE_CACHE_MAX_ENTRIES", "lots"),
            ("SIMPLE_CACHE_DEFAULT_TTL_MS", "-1"),
        ]))
        .unwrap();
        assert_eq!(config.max_entries, None);
        assert_eq!(config.default_ttl_ms, None);
    }

    #[test]
    fn test_reads_process_environment() {
        // Only test in this crate that touches the process environment
        unsafe {
            std::env::set_var("SIMPLE_CACHE_NAME", "from-env");
            std::env::set_var("SIMPLE_CACHE_BACKEND", "foyer");
            std::env::set_var("SIMPLE_CACHE_MAX_ENTRIES", "12");
        }

        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config.name, "from-env");
        assert_eq!(config.backend, BackendKind::Foyer);
        assert_eq!(config.max_entries, Some(12));

        // Variables already set win over a .env file, so the result is the same
        let config = StoreConfig::from_dotenv().unwrap();
        assert_eq!(config.name, "from-env");
        assert_eq!(config.backend, BackendKind::Foyer);

        unsafe {
            std::env::remove_var("SIMPLE_CACHE_NAME");
            std::env::remove_var("SIMPLE_CACHE_BACKEND");
            std::env::remove_var("SIMPLE_CACHE_MAX_ENTRIES");
        }
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = StoreConfig::from_lookup(lookup_from(&[("SIMPLE_CACHE_BACKEND", "redis")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
