//! Timer state machine - the single authority over the active time entry
//!
//! States are Idle, Running and Paused. Each transition writes the hosted
//! store first, then commits the stored row locally, mirrors it into the
//! local cache and publishes a notification. Transitions that do not apply
//! to the current state return `Ok(None)` without touching anything.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use ticktally_common::time::{Clock, SystemClock};
use ticktally_domain::{
    CachedTimerState, NewTimeEntry, Result, Task, TaskPatch, TickTallyError, TimeEntry,
    TimeEntryPatch, TimerStatus,
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::duration::{elapsed_seconds, entry_elapsed_seconds, paused_seconds_at};
use super::ports::{LocalTimerCache, TimeEntryStore};
use crate::events::{Notification, NotificationBus};
use crate::notifier::{LogNotifier, UserNotifier};
use crate::projects::ports::TaskStore;

pub struct TimerService<C: Clock = SystemClock> {
    entries: Arc<dyn TimeEntryStore>,
    tasks: Arc<dyn TaskStore>,
    cache: Arc<dyn LocalTimerCache>,
    bus: NotificationBus,
    notifier: Arc<dyn UserNotifier>,
    clock: C,
    active: Mutex<Option<TimeEntry>>,
    // Held for a whole transition so a second call observes the first's result.
    transitions: tokio::sync::Mutex<()>,
}

impl<C: Clock> TimerService<C> {
    pub fn new(
        entries: Arc<dyn TimeEntryStore>,
        tasks: Arc<dyn TaskStore>,
        cache: Arc<dyn LocalTimerCache>,
        bus: NotificationBus,
        clock: C,
    ) -> Self {
        Self {
            entries,
            tasks,
            cache,
            bus,
            notifier: Arc::new(LogNotifier),
            clock,
            active: Mutex::new(None),
            transitions: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the default [`LogNotifier`].
    pub fn with_notifier(mut self, notifier: Arc<dyn UserNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn status(&self) -> TimerStatus {
        self.active.lock().as_ref().map_or(TimerStatus::Idle, TimeEntry::status)
    }

    pub fn active_entry(&self) -> Option<TimeEntry> {
        self.active.lock().clone()
    }

    /// Elapsed seconds of the active entry right now, 0 when idle.
    pub fn elapsed_seconds(&self) -> i64 {
        self.active_entry().map_or(0, |entry| entry_elapsed_seconds(&entry, self.clock.utc_now()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.bus.subscribe()
    }

    /// Last mirrored timer state, read from the local cache only.
    ///
    /// Advisory: use it to paint the display before [`restore`](Self::restore)
    /// answers.
    pub fn cached_snapshot(&self) -> Option<CachedTimerState> {
        match self.cache.load() {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "Failed to read local timer cache");
                None
            }
        }
    }

    /// Reconcile local state with the store.
    ///
    /// Adopts the most recently started running entry and finalizes any other
    /// running entries so at most one stays open.
    pub async fn restore(&self) -> Result<Option<TimeEntry>> {
        let now = self.clock.utc_now();
        let _guard = self.transitions.lock().await;
        let cached = self.cached_snapshot();

        let mut running = self.running_entries().await.map_err(|err| self.report("restore", err))?;
        let current = running.pop();
        for stale in running {
            warn!(entry_id = %stale.id, "Finalizing extra running entry found during restore");
            self.finish(stale, now).await.map_err(|err| self.report("restore", err))?;
        }

        match &current {
            Some(entry) => {
                if cached.as_ref().is_some_and(|state| state.entry_id != entry.id) {
                    debug!(entry_id = %entry.id, "Local timer mirror disagreed with store");
                }
                *self.active.lock() = Some(entry.clone());
                self.mirror(entry, now);
                info!(entry_id = %entry.id, status = %entry.status(), "Restored active timer");
            }
            None => {
                *self.active.lock() = None;
                if cached.is_some() {
                    debug!("Clearing stale local timer mirror");
                }
                self.clear_mirror();
            }
        }
        Ok(current)
    }

    /// Start a new session, finalizing whatever is active first.
    pub async fn start(&self, task_id: Uuid, project_id: Uuid) -> Result<TimeEntry> {
        let now = self.clock.utc_now();
        let _guard = self.transitions.lock().await;

        let previous = match self.active_entry() {
            Some(entry) => vec![entry],
            None => self.running_entries().await.map_err(|err| self.report("start", err))?,
        };
        for entry in previous {
            info!(entry_id = %entry.id, "Finalizing previous timer before start");
            self.finish(entry, now).await.map_err(|err| self.report("start", err))?;
        }

        let created = self
            .entries
            .create(NewTimeEntry::running(task_id, project_id, now))
            .await
            .map_err(|err| self.report("start", err))?;

        self.commit(&created, now);
        info!(entry_id = %created.id, %task_id, %project_id, "Timer started");
        self.bus.publish(Notification::TimerStarted {
            entry_id: created.id,
            task_id: created.task_id,
            project_id: created.project_id,
            start_time: created.start_time,
        });
        Ok(created)
    }

    pub async fn pause(&self) -> Result<Option<TimeEntry>> {
        let now = self.clock.utc_now();
        let _guard = self.transitions.lock().await;

        let Some(entry) = self.active_entry() else {
            debug!("Pause ignored: no active timer");
            return Ok(None);
        };
        if entry.is_paused {
            debug!(entry_id = %entry.id, "Pause ignored: already paused");
            return Ok(None);
        }

        let patch = TimeEntryPatch {
            is_paused: Some(true),
            paused_at: Some(Some(now)),
            ..Default::default()
        };
        let updated =
            self.entries.update(entry.id, patch).await.map_err(|err| self.report("pause", err))?;

        // The stored pause mark is authoritative for the frozen elapsed value.
        let elapsed = entry_elapsed_seconds(&updated, now);
        self.commit(&updated, now);
        info!(entry_id = %updated.id, elapsed_seconds = elapsed, "Timer paused");
        self.bus.publish(Notification::TimerPaused { entry_id: updated.id, elapsed_seconds: elapsed });
        Ok(Some(updated))
    }

    pub async fn resume(&self) -> Result<Option<TimeEntry>> {
        let now = self.clock.utc_now();
        let _guard = self.transitions.lock().await;

        let Some(entry) = self.active_entry() else {
            debug!("Resume ignored: no active timer");
            return Ok(None);
        };
        if !entry.is_paused {
            debug!(entry_id = %entry.id, "Resume ignored: timer is running");
            return Ok(None);
        }

        // A pause without a recorded start contributes nothing.
        let paused_seconds = paused_seconds_at(&entry, now);
        let patch = TimeEntryPatch {
            is_paused: Some(false),
            paused_seconds: Some(paused_seconds),
            paused_at: Some(None),
            ..Default::default()
        };
        let updated =
            self.entries.update(entry.id, patch).await.map_err(|err| self.report("resume", err))?;

        let elapsed = elapsed_seconds(updated.start_time, now, updated.paused_seconds);
        self.commit(&updated, now);
        info!(entry_id = %updated.id, paused_seconds, elapsed_seconds = elapsed, "Timer resumed");
        self.bus.publish(Notification::TimerResumed {
            entry_id: updated.id,
            start_time: updated.start_time,
            paused_seconds: updated.paused_seconds,
            elapsed_seconds: elapsed,
        });
        Ok(Some(updated))
    }

    /// Finalize the active session. With `auto_complete` the task is also
    /// marked completed and credited with the session's duration.
    ///
    /// Local state is released even when the store write fails, so the
    /// display never shows a timer the user asked to stop.
    pub async fn stop(&self, auto_complete: bool) -> Result<Option<TimeEntry>> {
        let now = self.clock.utc_now();
        let _guard = self.transitions.lock().await;

        let Some(entry) = self.active_entry() else {
            debug!("Stop ignored: no active timer");
            return Ok(None);
        };

        let (finished, duration) =
            self.finish(entry, now).await.map_err(|err| self.report("stop", err))?;

        if auto_complete {
            self.complete_task(&finished, duration, now)
                .await
                .map_err(|err| self.report("complete_task", err))?;
        }
        Ok(Some(finished))
    }

    async fn running_entries(&self) -> Result<Vec<TimeEntry>> {
        let mut running: Vec<TimeEntry> =
            self.entries.list().await?.into_iter().filter(|entry| entry.is_running).collect();
        running.sort_by_key(|entry| entry.start_time);
        Ok(running)
    }

    /// Close `entry` at `now`, release it locally and announce the stop.
    async fn finish(&self, entry: TimeEntry, now: DateTime<Utc>) -> Result<(TimeEntry, i64)> {
        let paused_seconds = paused_seconds_at(&entry, now);
        let duration = elapsed_seconds(entry.start_time, now, paused_seconds);
        let patch = TimeEntryPatch {
            end_time: Some(now),
            duration_seconds: Some(duration),
            is_running: Some(false),
            is_paused: Some(false),
            paused_seconds: Some(paused_seconds),
            paused_at: Some(None),
        };
        let result = self.entries.update(entry.id, patch).await;

        self.release(entry.id);
        self.bus.publish(Notification::TimerStopped { entry_id: entry.id, duration_seconds: duration });

        let finished = result?;
        info!(entry_id = %finished.id, duration_seconds = duration, paused_seconds, "Timer stopped");
        Ok((finished, duration))
    }

    async fn complete_task(
        &self,
        finished: &TimeEntry,
        duration: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>> {
        let Some(task) = self.tasks.get(finished.task_id).await? else {
            warn!(task_id = %finished.task_id, "Auto-complete skipped: task not found");
            return Ok(None);
        };

        let patch = TaskPatch::completion(&task, finished.start_time, duration, now);
        let updated = self.tasks.update(task.id, patch).await?;
        info!(task_id = %updated.id, elapsed_seconds = updated.elapsed_seconds, "Task completed");
        self.bus.publish(Notification::TaskCompleted {
            task_id: updated.id,
            elapsed_seconds: updated.elapsed_seconds,
        });
        Ok(Some(updated))
    }

    fn commit(&self, entry: &TimeEntry, now: DateTime<Utc>) {
        *self.active.lock() = Some(entry.clone());
        self.mirror(entry, now);
    }

    fn release(&self, entry_id: Uuid) {
        {
            let mut active = self.active.lock();
            if active.as_ref().is_some_and(|entry| entry.id == entry_id) {
                *active = None;
            }
        }
        self.clear_mirror();
    }

    fn mirror(&self, entry: &TimeEntry, now: DateTime<Utc>) {
        let state = CachedTimerState::from_entry(entry, entry_elapsed_seconds(entry, now), now);
        if let Err(err) = self.cache.save(&state) {
            warn!(entry_id = %entry.id, error = %err, "Failed to mirror timer into local cache");
        }
    }

    fn clear_mirror(&self) {
        if let Err(err) = self.cache.clear() {
            warn!(error = %err, "Failed to clear local timer cache");
        }
    }

    fn report(&self, action: &str, err: TickTallyError) -> TickTallyError {
        error!(action, error = %err, "Timer transition failed");
        self.notifier.notify_error(action, &err);
        err
    }
}
