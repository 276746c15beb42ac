//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment, if one exists
//! 2. Attempts to load from environment variables
//! 3. If the store variables are missing, falls back to loading from file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `TICKTALLY_STORE_URL`: Hosted store base URL (required)
//! - `TICKTALLY_STORE_API_KEY`: Public API key (required)
//! - `TICKTALLY_STORE_ACCESS_TOKEN`: Session token of the signed-in owner
//! - `TICKTALLY_STORE_TIMEOUT_SECS`: Request timeout in seconds
//! - `TICKTALLY_LOCAL_CACHE_PATH`: SQLite file for the local timer mirror
//! - `TICKTALLY_TICK_INTERVAL_MS`: Display tick period
//! - `TICKTALLY_TAG_BATCH_DELAY_MS`: Tag lookup batch window
//! - `TICKTALLY_TAG_CACHE_TTL_SECS`: Tag lookup cache TTL
//! - `TICKTALLY_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `TICKTALLY_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` then `./ticktally.{json,toml}`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ticktally_domain::{
    Config, LocalCacheConfig, LoggingConfig, Result, StoreConfig, TagConfig, TickTallyError,
    TimerConfig,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "ticktally.json", "ticktally.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `TickTallyError::Config` if neither the environment nor any
/// config file yields a valid configuration.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only the store URL and API key are required; every other setting falls
/// back to its default.
///
/// # Errors
/// Returns `TickTallyError::Config` if a required variable is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let timer = TimerConfig::default();
    let tags = TagConfig::default();
    let logging = LoggingConfig::default();

    let store = StoreConfig {
        base_url: env_var("TICKTALLY_STORE_URL")?,
        api_key: env_var("TICKTALLY_STORE_API_KEY")?,
        access_token: std::env::var("TICKTALLY_STORE_ACCESS_TOKEN").ok().filter(|t| !t.is_empty()),
        timeout_seconds: env_parse("TICKTALLY_STORE_TIMEOUT_SECS")?
            .unwrap_or(ticktally_domain::constants::DEFAULT_STORE_TIMEOUT_SECS),
    };

    let local_cache = std::env::var("TICKTALLY_LOCAL_CACHE_PATH")
        .map(|path| LocalCacheConfig { path: PathBuf::from(path) })
        .unwrap_or_default();

    Ok(Config {
        store,
        local_cache,
        timer: TimerConfig {
            tick_interval_ms: env_parse("TICKTALLY_TICK_INTERVAL_MS")?
                .unwrap_or(timer.tick_interval_ms),
        },
        tags: TagConfig {
            batch_delay_ms: env_parse("TICKTALLY_TAG_BATCH_DELAY_MS")?
                .unwrap_or(tags.batch_delay_ms),
            cache_ttl_seconds: env_parse("TICKTALLY_TAG_CACHE_TTL_SECS")?
                .unwrap_or(tags.cache_ttl_seconds),
        },
        logging: LoggingConfig {
            level: std::env::var("TICKTALLY_LOG_LEVEL").unwrap_or(logging.level),
            json: env_bool("TICKTALLY_LOG_JSON", logging.json),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. The format is chosen by file extension.
///
/// # Errors
/// Returns `TickTallyError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TickTallyError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TickTallyError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TickTallyError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TickTallyError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TickTallyError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TickTallyError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file
///
/// Returns the first existing candidate, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots.iter().flat_map(|root| candidates_under(root)).find(|path| path.exists())
}

fn candidates_under(root: &Path) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> =
        CONFIG_FILE_NAMES.iter().map(|name| root.join(name)).collect();
    for ancestor in ["..", "../.."] {
        candidates.push(root.join(ancestor).join("config.json"));
        candidates.push(root.join(ancestor).join("config.toml"));
    }
    candidates
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        TickTallyError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// `Ok(None)` when unset, an error when set but unparsable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| TickTallyError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
