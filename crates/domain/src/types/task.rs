//! Tasks tracked under a project

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use crate::errors::{Result, TickTallyError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_seconds: Option<i64>,
    #[serde(default)]
    pub scheduled_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_end_time: Option<DateTime<Utc>>,
    /// Seconds accumulated by finished time entries and explicit edits.
    #[serde(default)]
    pub elapsed_seconds: i64,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub estimated_seconds: Option<i64>,
    pub scheduled_start: Option<DateTime<Utc>>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub estimated_seconds: Option<i64>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub elapsed_seconds: Option<i64>,
    pub is_completed: Option<bool>,
}

impl NewTask {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TickTallyError::InvalidInput("task.name must not be empty".into()));
        }
        if matches!(self.estimated_seconds, Some(secs) if secs < 0) {
            return Err(TickTallyError::InvalidInput(
                "task.estimated_seconds must be >= 0".into(),
            ));
        }
        Ok(())
    }
}

impl TaskPatch {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(TickTallyError::InvalidInput("task.name must not be empty".into()));
        }
        if matches!(self.elapsed_seconds, Some(secs) if secs < 0) {
            return Err(TickTallyError::InvalidInput("task.elapsed_seconds must be >= 0".into()));
        }
        if matches!(self.estimated_seconds, Some(secs) if secs < 0) {
            return Err(TickTallyError::InvalidInput(
                "task.estimated_seconds must be >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Patch that marks a task finished after a timer session that began at
    /// `session_start` and lasted `duration_seconds`.
    pub fn completion(
        task: &Task,
        session_start: DateTime<Utc>,
        duration_seconds: i64,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            elapsed_seconds: Some(task.elapsed_seconds + duration_seconds.max(0)),
            is_completed: Some(true),
            actual_end_time: Some(finished_at),
            actual_start_time: task.actual_start_time.is_none().then_some(session_start),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(estimate) = self.estimated_seconds {
            task.estimated_seconds = Some(estimate);
        }
        if let Some(start) = self.scheduled_start {
            task.scheduled_start = Some(start);
        }
        if let Some(start) = self.actual_start_time {
            task.actual_start_time = Some(start);
        }
        if let Some(end) = self.actual_end_time {
            task.actual_end_time = Some(end);
        }
        if let Some(elapsed) = self.elapsed_seconds {
            task.elapsed_seconds = elapsed;
        }
        if let Some(completed) = self.is_completed {
            task.is_completed = completed;
        }
    }
}
