use std::sync::Arc;

use async_trait::async_trait;
use ticktally_core::{ProjectStore, TaskStore};
use ticktally_domain::{NewProject, NewTask, Project, ProjectPatch, Result, Task, TaskPatch};
use uuid::Uuid;

use super::rest::{eq, RestClient};
use super::{PROJECTS_TABLE, TASKS_TABLE};

pub struct RestProjectStore {
    client: Arc<RestClient>,
}

impl RestProjectStore {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProjectStore for RestProjectStore {
    async fn list(&self) -> Result<Vec<Project>> {
        self.client.select(PROJECTS_TABLE, &[("order", "created_at.asc".to_string())]).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Project>> {
        self.client.select_one(PROJECTS_TABLE, &[("id", eq(id))]).await
    }

    async fn create(&self, project: NewProject) -> Result<Project> {
        self.client.insert(PROJECTS_TABLE, &project).await
    }

    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project> {
        self.client.update(PROJECTS_TABLE, id, &patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.client.delete(PROJECTS_TABLE, &[("id", eq(id))]).await
    }
}

pub struct RestTaskStore {
    client: Arc<RestClient>,
}

impl RestTaskStore {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskStore for RestTaskStore {
    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Task>> {
        self.client
            .select(
                TASKS_TABLE,
                &[("project_id", eq(project_id)), ("order", "created_at.asc".to_string())],
            )
            .await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        self.client.select_one(TASKS_TABLE, &[("id", eq(id))]).await
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        self.client.insert(TASKS_TABLE, &task).await
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task> {
        self.client.update(TASKS_TABLE, id, &patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.client.delete(TASKS_TABLE, &[("id", eq(id))]).await
    }
}
