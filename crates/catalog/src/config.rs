use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} must be a valid {expected}, got `{value}`")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Catalog configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// JSON fixture the in-memory store is seeded from.
    pub fixture_path: PathBuf,
    /// Maximum items in the recommended section.
    pub recommended_limit: usize,
    /// Maximum items in the hot ranking section.
    pub hot_ranking_limit: usize,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl CatalogConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            fixture_path: lookup("CATALOG_FIXTURE")
                .map(PathBuf::from)
                .ok_or(ConfigError::Missing("CATALOG_FIXTURE"))?,
            recommended_limit: parse_or(&lookup, "RECOMMENDED_LIMIT", "usize", 5)?,
            hot_ranking_limit: parse_or(&lookup, "HOT_RANKING_LIMIT", "usize", 10)?,
            event_bus_capacity: parse_or(&lookup, "EVENT_BUS_CAPACITY", "usize", 1024)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(
    lookup: &F,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value,
        }),
    }
}
