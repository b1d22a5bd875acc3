//! Image fetcher configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_CACHE_ENTRIES,
};

fn default_max_cache_entries() -> u64 {
    DEFAULT_MAX_CACHE_ENTRIES
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

/// Settings for loading template and watermark images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Maximum number of decoded images kept in memory (default: 100)
    #[serde(default = "default_max_cache_entries")]
    pub max_cache_entries: u64,
    /// Seconds a decoded image stays cached (default: 3600)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// HTTP request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_cache_entries: default_max_cache_entries(),
            cache_ttl_secs: default_cache_ttl_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FetcherConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("fetcher.timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}
