//! Local fast-access cache for the active timer mirror

pub mod sqlite;

pub use sqlite::SqliteLocalCache;
