//! Timestamps, entities and a pre-wired timer service

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use ticktally_common::time::MockClock;
use ticktally_core::{Notification, NotificationBus, TimerService};
use ticktally_domain::{Project, Task, TimeEntry};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::stores::{MemoryTaskStore, MemoryTimeEntryStore, MemoryTimerCache, RecordingNotifier};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

pub fn project(name: &str) -> Project {
    Project {
        id: Uuid::new_v4(),
        name: name.into(),
        hourly_rate: 40.0,
        owner_id: Uuid::new_v4(),
        team_id: None,
        created_at: t0(),
    }
}

pub fn task(project_id: Uuid, name: &str) -> Task {
    Task {
        id: Uuid::new_v4(),
        project_id,
        name: name.into(),
        description: None,
        estimated_seconds: None,
        scheduled_start: None,
        actual_start_time: None,
        actual_end_time: None,
        elapsed_seconds: 0,
        is_completed: false,
        created_at: t0(),
    }
}

/// A running entry as another session would have left it in the store.
pub fn running_entry(task: &Task, start: DateTime<Utc>) -> TimeEntry {
    TimeEntry {
        id: Uuid::new_v4(),
        task_id: task.id,
        project_id: task.project_id,
        owner_id: Uuid::new_v4(),
        start_time: start,
        end_time: None,
        duration_seconds: None,
        is_running: true,
        is_paused: false,
        paused_seconds: 0,
        paused_at: None,
    }
}

/// Drain every notification currently queued on `receiver`.
pub fn drain(receiver: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

/// Timer service wired to in-memory stores and a mock clock at [`t0`].
pub struct TimerHarness {
    pub clock: MockClock,
    pub entries: Arc<MemoryTimeEntryStore>,
    pub tasks: Arc<MemoryTaskStore>,
    pub cache: Arc<MemoryTimerCache>,
    pub notifier: Arc<RecordingNotifier>,
    pub bus: NotificationBus,
    pub service: TimerService<MockClock>,
}

impl TimerHarness {
    pub fn new() -> Self {
        let clock = MockClock::at(t0());
        let entries = Arc::new(MemoryTimeEntryStore::default());
        let tasks = Arc::new(MemoryTaskStore::default());
        let cache = Arc::new(MemoryTimerCache::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let bus = NotificationBus::default();
        let service = TimerService::new(
            entries.clone(),
            tasks.clone(),
            cache.clone(),
            bus.clone(),
            clock.clone(),
        )
        .with_notifier(notifier.clone());

        Self { clock, entries, tasks, cache, notifier, bus, service }
    }

    /// A second service over the same stores, as after an app reload.
    pub fn reload(&self) -> TimerService<MockClock> {
        TimerService::new(
            self.entries.clone(),
            self.tasks.clone(),
            self.cache.clone(),
            self.bus.clone(),
            self.clock.clone(),
        )
        .with_notifier(self.notifier.clone())
    }

    /// Seed a project/task pair and return the task.
    pub fn seed_task(&self, name: &str) -> Task {
        let task = task(Uuid::new_v4(), name);
        self.tasks.insert(task.clone());
        task
    }
}
