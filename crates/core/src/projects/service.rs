//! Project and task management with plan gating

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ticktally_domain::{
    NewProject, NewTask, Project, ProjectPatch, Result, Task, TaskPatch, TickTallyError,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::ports::{ProjectStore, TaskStore};
use crate::billing::plans::PlanProvider;
use crate::events::{Notification, NotificationBus};

pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
    tasks: Arc<dyn TaskStore>,
    plans: Arc<dyn PlanProvider>,
    bus: NotificationBus,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        tasks: Arc<dyn TaskStore>,
        plans: Arc<dyn PlanProvider>,
        bus: NotificationBus,
    ) -> Self {
        Self { projects, tasks, plans, bus }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.projects.list().await
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project> {
        self.projects
            .get(id)
            .await?
            .ok_or_else(|| TickTallyError::NotFound(format!("project {id}")))
    }

    /// Create a project if the owner's current plan allows another one.
    ///
    /// A pending upgrade does not count until it becomes the current tier.
    pub async fn create_project(&self, project: NewProject) -> Result<Project> {
        project.validate()?;

        let plan = self.plans.current_plan().await?;
        let active = self.projects.list().await?.len();
        if !plan.can_create_project(active) {
            let limit = plan.current.max_active_projects().unwrap_or(usize::MAX);
            warn!(plan = %plan.current, active, limit, "Project creation blocked by plan");
            return Err(TickTallyError::PlanLimitReached(format!(
                "the {} plan allows {limit} active projects",
                plan.current
            )));
        }

        let created = self.projects.create(project).await?;
        info!(project_id = %created.id, plan = %plan.current, "Project created");
        Ok(created)
    }

    pub async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> Result<Project> {
        patch.validate()?;
        if patch.is_empty() {
            return self.get_project(id).await;
        }
        self.projects.update(id, patch).await
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<()> {
        self.projects.delete(id).await?;
        info!(project_id = %id, "Project deleted");
        Ok(())
    }

    pub async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>> {
        self.tasks.list_for_project(project_id).await
    }

    pub async fn create_task(&self, task: NewTask) -> Result<Task> {
        task.validate()?;
        // Surface a clear error instead of a foreign-key rejection.
        self.get_project(task.project_id).await?;
        let created = self.tasks.create(task).await?;
        info!(task_id = %created.id, project_id = %created.project_id, "Task created");
        Ok(created)
    }

    /// Explicit edit. Values set here win over anything the timer credited.
    pub async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task> {
        patch.validate()?;
        self.tasks.update(id, patch).await
    }

    /// Mark a task completed without a timer session.
    pub async fn complete_task(&self, id: Uuid, finished_at: DateTime<Utc>) -> Result<Task> {
        let patch = TaskPatch {
            is_completed: Some(true),
            actual_end_time: Some(finished_at),
            ..Default::default()
        };
        let updated = self.tasks.update(id, patch).await?;
        info!(task_id = %id, elapsed_seconds = updated.elapsed_seconds, "Task completed");
        self.bus.publish(Notification::TaskCompleted {
            task_id: updated.id,
            elapsed_seconds: updated.elapsed_seconds,
        });
        Ok(updated)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        self.tasks.delete(id).await
    }
}
