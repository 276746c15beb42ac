//! Configuration structures
//!
//! Loaded by the infrastructure layer from environment variables or a
//! JSON/TOML file. Every section except `store` has defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_STORE_TIMEOUT_SECS, DEFAULT_TAG_BATCH_DELAY_MS, DEFAULT_TAG_CACHE_TTL_SECS,
    DEFAULT_TICK_INTERVAL_MS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub local_cache: LocalCacheConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub tags: TagConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hosted table store connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyz.example.co`
    pub base_url: String,
    /// Public API key sent as the `apikey` header
    pub api_key: String,
    /// Session token of the authenticated owner, if already signed in
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_store_timeout")]
    pub timeout_seconds: u64,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCacheConfig {
    pub path: PathBuf,
}

impl Default for LocalCacheConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("ticktally-cache.db") }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

impl TimerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { tick_interval_ms: DEFAULT_TICK_INTERVAL_MS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConfig {
    #[serde(default = "default_batch_delay")]
    pub batch_delay_ms: u64,
    #[serde(default = "default_tag_ttl")]
    pub cache_ttl_seconds: u64,
}

impl TagConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            batch_delay_ms: DEFAULT_TAG_BATCH_DELAY_MS,
            cache_ttl_seconds: DEFAULT_TAG_CACHE_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_store_timeout() -> u64 {
    DEFAULT_STORE_TIMEOUT_SECS
}

fn default_tick_interval() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_batch_delay() -> u64 {
    DEFAULT_TAG_BATCH_DELAY_MS
}

fn default_tag_ttl() -> u64 {
    DEFAULT_TAG_CACHE_TTL_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}
