//! SQLite-backed key/value store for [`CachedTimerState`].
//!
//! The mirror is advisory: the hosted store stays authoritative and the timer
//! service logs and ignores any failure reported here. Calls are short single
//! statements, so they run inline instead of through `spawn_blocking`.

use std::path::Path;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use ticktally_core::LocalTimerCache;
use ticktally_domain::constants::LOCAL_CACHE_TIMER_KEY;
use ticktally_domain::{CachedTimerState, Result, TickTallyError};
use tracing::{debug, warn};

use crate::errors::InfraError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS timer_cache (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)";

pub struct SqliteLocalCache {
    conn: Mutex<Connection>,
}

impl SqliteLocalCache {
    /// Open (or create) the cache file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                TickTallyError::Cache(format!(
                    "cannot create local cache directory {}: {err}",
                    parent.display()
                ))
            })?;
        }
        let conn = Connection::open(path).map_err(into_domain)?;
        debug!(path = %path.display(), "Opened local timer cache");
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(into_domain)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(into_domain)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl LocalTimerCache for SqliteLocalCache {
    fn load(&self) -> Result<Option<CachedTimerState>> {
        let raw: Option<String> = self
            .conn
            .lock()
            .query_row(
                "SELECT value FROM timer_cache WHERE key = ?1",
                params![LOCAL_CACHE_TIMER_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(into_domain)?;

        let Some(raw) = raw else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                warn!(error = %err, "Discarding unreadable timer mirror");
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, state: &CachedTimerState) -> Result<()> {
        let value =
            serde_json::to_string(state).map_err(|err| TickTallyError::from(InfraError::from(err)))?;
        self.conn
            .lock()
            .execute(
                "INSERT INTO timer_cache (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![LOCAL_CACHE_TIMER_KEY, value, Utc::now().timestamp()],
            )
            .map_err(into_domain)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.conn
            .lock()
            .execute("DELETE FROM timer_cache WHERE key = ?1", params![LOCAL_CACHE_TIMER_KEY])
            .map_err(into_domain)?;
        Ok(())
    }
}

fn into_domain(err: rusqlite::Error) -> TickTallyError {
    InfraError::from(err).into()
}
