//! Earnings derived from tracked time

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use ticktally_common::time::format_clock;
use ticktally_domain::constants::SECONDS_PER_HOUR;
use ticktally_domain::{Project, Task, TimeEntry};
use uuid::Uuid;

use crate::timer::duration::entry_elapsed_seconds;

/// `seconds / 3600 * hourly_rate`, rounded to cents.
pub fn earnings(seconds: i64, hourly_rate: f64) -> f64 {
    if !hourly_rate.is_finite() || hourly_rate <= 0.0 {
        return 0.0;
    }
    let raw = seconds.max(0) as f64 / SECONDS_PER_HOUR * hourly_rate;
    (raw * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskLine {
    pub task_id: Uuid,
    /// `None` when entries reference a task that no longer exists.
    pub task_name: Option<String>,
    pub seconds: i64,
    pub earnings: f64,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    pub project_id: Uuid,
    pub project_name: String,
    pub hourly_rate: f64,
    pub total_seconds: i64,
    pub total_earnings: f64,
    pub tasks: Vec<TaskLine>,
}

impl ProjectReport {
    /// Total tracked time as `HH:MM:SS`.
    pub fn total_clock(&self) -> String {
        format_clock(self.total_seconds)
    }
}

/// Aggregate a project's tracked time per task.
///
/// Finished entries contribute their duration and a running entry its live
/// elapsed at `now`. A task without any entries falls back to its own
/// `elapsed_seconds`, which covers manually entered time. Entries of other
/// projects are ignored.
pub fn build_project_report(
    project: &Project,
    tasks: &[Task],
    entries: &[TimeEntry],
    now: DateTime<Utc>,
) -> ProjectReport {
    let mut tracked: HashMap<Uuid, i64> = HashMap::new();
    for entry in entries.iter().filter(|entry| entry.project_id == project.id) {
        *tracked.entry(entry.task_id).or_default() += entry_elapsed_seconds(entry, now);
    }

    let mut lines: Vec<TaskLine> = tasks
        .iter()
        .filter(|task| task.project_id == project.id)
        .map(|task| {
            let seconds = tracked.remove(&task.id).unwrap_or(task.elapsed_seconds).max(0);
            TaskLine {
                task_id: task.id,
                task_name: Some(task.name.clone()),
                seconds,
                earnings: earnings(seconds, project.hourly_rate),
                is_completed: task.is_completed,
            }
        })
        .collect();

    lines.extend(tracked.into_iter().map(|(task_id, seconds)| TaskLine {
        task_id,
        task_name: None,
        seconds,
        earnings: earnings(seconds, project.hourly_rate),
        is_completed: false,
    }));
    lines.sort_by(|a, b| b.seconds.cmp(&a.seconds).then_with(|| a.task_id.cmp(&b.task_id)));

    let total_seconds = lines.iter().map(|line| line.seconds).sum();
    ProjectReport {
        project_id: project.id,
        project_name: project.name.clone(),
        hourly_rate: project.hourly_rate,
        total_seconds,
        total_earnings: earnings(total_seconds, project.hourly_rate),
        tasks: lines,
    }
}
