//! In-memory mocks for the core ports.
//!
//! Each mock can be told to fail so error paths can be exercised without a
//! network. Failures surface as `TickTallyError::Network`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use ticktally_core::{
    LocalTimerCache, PlanProvider, ProjectStore, TagStore, TaskStore, TimeEntryStore,
    UserNotifier,
};
use ticktally_domain::{
    CachedTimerState, NewProject, NewTag, NewTask, NewTimeEntry, Project, ProjectPatch,
    Result as DomainResult, Tag, Task, TaskPatch, TaskTag, TickTallyError, TimeEntry,
    TimeEntryPatch, UserPlan,
};
use uuid::Uuid;

fn outage() -> TickTallyError {
    TickTallyError::Network("simulated outage".into())
}

/// In-memory `TimeEntryStore`. Rows keep insertion order.
#[derive(Default)]
pub struct MemoryTimeEntryStore {
    rows: Mutex<Vec<TimeEntry>>,
    fail_writes: AtomicBool,
    fail_list: AtomicBool,
    writes: AtomicUsize,
    write_delay: Mutex<Option<Duration>>,
    pause_skew_secs: AtomicUsize,
}

impl MemoryTimeEntryStore {
    pub fn seed(&self, entry: TimeEntry) {
        self.rows.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<TimeEntry> {
        self.rows.lock().clone()
    }

    pub fn entry(&self, id: Uuid) -> Option<TimeEntry> {
        self.rows.lock().iter().find(|entry| entry.id == id).cloned()
    }

    pub fn running(&self) -> Vec<TimeEntry> {
        self.rows.lock().iter().filter(|entry| entry.is_running).cloned().collect()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Hold every create and update for `delay` so overlapping callers interleave.
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock() = Some(delay);
    }

    /// Record pause marks `secs` earlier than requested, like a store that
    /// stamps rows with its own clock.
    pub fn skew_paused_at(&self, secs: usize) {
        self.pause_skew_secs.store(secs, Ordering::SeqCst);
    }

    async fn write_pause(&self) {
        let delay = *self.write_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Successful creates and updates so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimeEntryStore for MemoryTimeEntryStore {
    async fn create(&self, entry: NewTimeEntry) -> DomainResult<TimeEntry> {
        self.write_pause().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(outage());
        }
        let row = TimeEntry {
            id: Uuid::new_v4(),
            task_id: entry.task_id,
            project_id: entry.project_id,
            owner_id: Uuid::nil(),
            start_time: entry.start_time,
            end_time: None,
            duration_seconds: None,
            is_running: entry.is_running,
            is_paused: entry.is_paused,
            paused_seconds: entry.paused_seconds,
            paused_at: None,
        };
        self.rows.lock().push(row.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: TimeEntryPatch) -> DomainResult<TimeEntry> {
        self.write_pause().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(outage());
        }
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| TickTallyError::NotFound(format!("time entry {id}")))?;
        patch.apply_to(row);
        let skew = self.pause_skew_secs.load(Ordering::SeqCst) as i64;
        if let (Some(Some(_)), Some(stamped)) = (patch.paused_at, row.paused_at) {
            row.paused_at = Some(stamped - chrono::Duration::seconds(skew));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row.clone())
    }

    async fn list(&self) -> DomainResult<Vec<TimeEntry>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(outage());
        }
        Ok(self.entries())
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    rows: Mutex<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn insert(&self, task: Task) {
        self.rows.lock().insert(task.id, task);
    }

    pub fn task(&self, id: Uuid) -> Option<Task> {
        self.rows.lock().get(&id).cloned()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_for_project(&self, project_id: Uuid) -> DomainResult<Vec<Task>> {
        Ok(self.rows.lock().values().filter(|task| task.project_id == project_id).cloned().collect())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Task>> {
        Ok(self.task(id))
    }

    async fn create(&self, task: NewTask) -> DomainResult<Task> {
        let row = Task {
            id: Uuid::new_v4(),
            project_id: task.project_id,
            name: task.name,
            description: task.description,
            estimated_seconds: task.estimated_seconds,
            scheduled_start: task.scheduled_start,
            actual_start_time: None,
            actual_end_time: None,
            elapsed_seconds: 0,
            is_completed: false,
            created_at: Utc::now(),
        };
        self.insert(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> DomainResult<Task> {
        let mut rows = self.rows.lock();
        let row = rows.get_mut(&id).ok_or_else(|| TickTallyError::NotFound(format!("task {id}")))?;
        patch.apply_to(row);
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.rows.lock().remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryProjectStore {
    rows: Mutex<Vec<Project>>,
}

impl MemoryProjectStore {
    pub fn insert(&self, project: Project) {
        self.rows.lock().push(project);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn list(&self) -> DomainResult<Vec<Project>> {
        Ok(self.rows.lock().clone())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Project>> {
        Ok(self.rows.lock().iter().find(|project| project.id == id).cloned())
    }

    async fn create(&self, project: NewProject) -> DomainResult<Project> {
        let row = Project {
            id: Uuid::new_v4(),
            name: project.name,
            hourly_rate: project.hourly_rate,
            owner_id: Uuid::nil(),
            team_id: project.team_id,
            created_at: Utc::now(),
        };
        self.insert(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: ProjectPatch) -> DomainResult<Project> {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|project| project.id == id)
            .ok_or_else(|| TickTallyError::NotFound(format!("project {id}")))?;
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(rate) = patch.hourly_rate {
            row.hourly_rate = rate;
        }
        if let Some(team_id) = patch.team_id {
            row.team_id = Some(team_id);
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.rows.lock().retain(|project| project.id != id);
        Ok(())
    }
}

/// In-memory `TagStore` that records each batch fetch.
#[derive(Default)]
pub struct MemoryTagStore {
    tags: Mutex<Vec<Tag>>,
    links: Mutex<Vec<TaskTag>>,
    fetches: Mutex<Vec<Vec<Uuid>>>,
    fail_fetch: AtomicBool,
    fetch_delay: Mutex<Option<Duration>>,
}

impl MemoryTagStore {
    pub fn link(&self, task_id: Uuid, tag_id: Uuid) {
        self.links.lock().push(TaskTag { task_id, tag_id });
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().len()
    }

    /// Task ids requested by each fetch, in call order.
    pub fn fetched_batches(&self) -> Vec<Vec<Uuid>> {
        self.fetches.lock().clone()
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn delay_fetch(&self, delay: Duration) {
        *self.fetch_delay.lock() = Some(delay);
    }
}

#[async_trait]
impl TagStore for MemoryTagStore {
    async fn list_tags(&self) -> DomainResult<Vec<Tag>> {
        Ok(self.tags.lock().clone())
    }

    async fn create_tag(&self, tag: NewTag) -> DomainResult<Tag> {
        let row = Tag { id: Uuid::new_v4(), name: tag.name, owner_id: Uuid::nil(), created_at: Utc::now() };
        self.tags.lock().push(row.clone());
        Ok(row)
    }

    async fn delete_tag(&self, id: Uuid) -> DomainResult<()> {
        self.tags.lock().retain(|tag| tag.id != id);
        self.links.lock().retain(|link| link.tag_id != id);
        Ok(())
    }

    async fn attach(&self, link: TaskTag) -> DomainResult<()> {
        let mut links = self.links.lock();
        if !links.contains(&link) {
            links.push(link);
        }
        Ok(())
    }

    async fn detach(&self, link: TaskTag) -> DomainResult<()> {
        self.links.lock().retain(|existing| *existing != link);
        Ok(())
    }

    async fn fetch_task_tags(&self, task_ids: &[Uuid]) -> DomainResult<Vec<TaskTag>> {
        self.fetches.lock().push(task_ids.to_vec());
        let delay = *self.fetch_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(outage());
        }
        Ok(self.links.lock().iter().filter(|link| task_ids.contains(&link.task_id)).copied().collect())
    }
}

#[derive(Default)]
pub struct MemoryTimerCache {
    state: Mutex<Option<CachedTimerState>>,
    fail: AtomicBool,
}

impl MemoryTimerCache {
    pub fn state(&self) -> Option<CachedTimerState> {
        self.state.lock().clone()
    }

    pub fn put(&self, state: CachedTimerState) {
        *self.state.lock() = Some(state);
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TickTallyError::Cache("disk full".into()));
        }
        Ok(())
    }
}

impl LocalTimerCache for MemoryTimerCache {
    fn load(&self) -> DomainResult<Option<CachedTimerState>> {
        self.check()?;
        Ok(self.state())
    }

    fn save(&self, state: &CachedTimerState) -> DomainResult<()> {
        self.check()?;
        self.put(state.clone());
        Ok(())
    }

    fn clear(&self) -> DomainResult<()> {
        self.check()?;
        *self.state.lock() = None;
        Ok(())
    }
}

/// Records every user-visible error instead of showing it.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, TickTallyError)>>,
}

impl RecordingNotifier {
    pub fn actions(&self) -> Vec<String> {
        self.messages.lock().iter().map(|(action, _)| action.clone()).collect()
    }
}

impl UserNotifier for RecordingNotifier {
    fn notify_error(&self, action: &str, error: &TickTallyError) {
        self.messages.lock().push((action.to_string(), error.clone()));
    }
}

pub struct StaticPlanProvider(pub UserPlan);

#[async_trait]
impl PlanProvider for StaticPlanProvider {
    async fn current_plan(&self) -> DomainResult<UserPlan> {
        Ok(self.0)
    }
}
