//! Port interfaces for timer persistence
//!
//! `TimeEntryStore` is the authoritative hosted store; `LocalTimerCache` is
//! the advisory fast-access mirror read on reload.

use async_trait::async_trait;
use ticktally_domain::{CachedTimerState, NewTimeEntry, Result, TimeEntry, TimeEntryPatch};
use uuid::Uuid;

/// Time entries of the current owner in the hosted store.
#[async_trait]
pub trait TimeEntryStore: Send + Sync {
    async fn create(&self, entry: NewTimeEntry) -> Result<TimeEntry>;

    /// Apply `patch` and return the stored row.
    async fn update(&self, id: Uuid, patch: TimeEntryPatch) -> Result<TimeEntry>;

    async fn list(&self) -> Result<Vec<TimeEntry>>;
}

/// Synchronous key/value mirror of the active timer.
pub trait LocalTimerCache: Send + Sync {
    fn load(&self) -> Result<Option<CachedTimerState>>;

    fn save(&self, state: &CachedTimerState) -> Result<()>;

    fn clear(&self) -> Result<()>;
}
