//! Port interfaces for project and task rows in the hosted store

use async_trait::async_trait;
use ticktally_domain::{NewProject, NewTask, Project, ProjectPatch, Result, Task, TaskPatch};
use uuid::Uuid;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Projects visible to the current owner.
    async fn list(&self) -> Result<Vec<Project>>;

    async fn get(&self, id: Uuid) -> Result<Option<Project>>;

    async fn create(&self, project: NewProject) -> Result<Project>;

    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Task>>;

    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    async fn create(&self, task: NewTask) -> Result<Task>;

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
