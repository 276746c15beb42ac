//! Time entries and the locally cached timer mirror

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use crate::impl_domain_status_conversions;

/// One timer session against a task.
///
/// At most one entry per owner has `is_running == true`. While paused,
/// `paused_at` records when the current pause began; the gap is folded into
/// `paused_seconds` on resume or stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TimeEntry {
    pub id: Uuid,
    pub task_id: Uuid,
    pub project_id: Uuid,
    pub owner_id: Uuid,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    pub is_running: bool,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub paused_seconds: i64,
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
}

impl TimeEntry {
    pub fn status(&self) -> TimerStatus {
        match (self.is_running, self.is_paused) {
            (false, _) => TimerStatus::Idle,
            (true, false) => TimerStatus::Running,
            (true, true) => TimerStatus::Paused,
        }
    }
}

/// Insert payload for a new timer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeEntry {
    pub task_id: Uuid,
    pub project_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub is_running: bool,
    pub is_paused: bool,
    pub paused_seconds: i64,
}

impl NewTimeEntry {
    /// A running, unpaused entry starting at `start_time`.
    pub fn running(task_id: Uuid, project_id: Uuid, start_time: DateTime<Utc>) -> Self {
        Self { task_id, project_id, start_time, is_running: true, is_paused: false, paused_seconds: 0 }
    }
}

/// Partial update sent to the store. `paused_at` distinguishes "leave alone"
/// (`None`) from "clear" (`Some(None)`).
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryPatch {
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    pub is_running: Option<bool>,
    pub is_paused: Option<bool>,
    pub paused_seconds: Option<i64>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub paused_at: Option<Option<DateTime<Utc>>>,
}

impl TimeEntryPatch {
    pub fn apply_to(&self, entry: &mut TimeEntry) {
        if let Some(end) = self.end_time {
            entry.end_time = Some(end);
        }
        if let Some(duration) = self.duration_seconds {
            entry.duration_seconds = Some(duration);
        }
        if let Some(running) = self.is_running {
            entry.is_running = running;
        }
        if let Some(paused) = self.is_paused {
            entry.is_paused = paused;
        }
        if let Some(paused_seconds) = self.paused_seconds {
            entry.paused_seconds = paused_seconds;
        }
        if let Some(paused_at) = self.paused_at {
            entry.paused_at = paused_at;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

impl_domain_status_conversions!(TimerStatus {
    Idle => "idle",
    Running => "running",
    Paused => "paused",
});

/// Advisory mirror of the active timer kept in the local fast-access cache.
///
/// Written on every transition so the display can resume after a reload
/// before the store answers. The store record stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct CachedTimerState {
    pub entry_id: Uuid,
    pub task_id: Uuid,
    pub project_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub is_paused: bool,
    pub paused_seconds: i64,
    pub paused_at: Option<DateTime<Utc>>,
    /// Elapsed seconds at the moment the mirror was written. Exact while
    /// paused; a lower bound while running.
    pub elapsed_seconds: i64,
    pub saved_at: DateTime<Utc>,
}

impl CachedTimerState {
    pub fn from_entry(entry: &TimeEntry, elapsed_seconds: i64, saved_at: DateTime<Utc>) -> Self {
        Self {
            entry_id: entry.id,
            task_id: entry.task_id,
            project_id: entry.project_id,
            start_time: entry.start_time,
            is_paused: entry.is_paused,
            paused_seconds: entry.paused_seconds,
            paused_at: entry.paused_at,
            elapsed_seconds,
            saved_at,
        }
    }

    pub fn status(&self) -> TimerStatus {
        if self.is_paused {
            TimerStatus::Paused
        } else {
            TimerStatus::Running
        }
    }
}
