//! Port interface for tags and the task ↔ tag join table

use async_trait::async_trait;
use ticktally_domain::{NewTag, Result, Tag, TaskTag};
use uuid::Uuid;

#[async_trait]
pub trait TagStore: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<Tag>>;

    async fn create_tag(&self, tag: NewTag) -> Result<Tag>;

    /// Delete a tag and its task associations.
    async fn delete_tag(&self, id: Uuid) -> Result<()>;

    async fn attach(&self, link: TaskTag) -> Result<()>;

    async fn detach(&self, link: TaskTag) -> Result<()>;

    /// Associations for every task in `task_ids`, in one request.
    async fn fetch_task_tags(&self, task_ids: &[Uuid]) -> Result<Vec<TaskTag>>;
}
