use std::sync::Arc;

use async_trait::async_trait;
use ticktally_core::TagStore;
use ticktally_domain::{NewTag, Result, Tag, TaskTag};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::rest::{eq, in_list, RestClient};
use super::{TAGS_TABLE, TASK_TAGS_TABLE};

/// `tags` rows and the `task_tags` join table.
pub struct RestTagStore {
    client: Arc<RestClient>,
}

impl RestTagStore {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TagStore for RestTagStore {
    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.client.select(TAGS_TABLE, &[("order", "name.asc".to_string())]).await
    }

    async fn create_tag(&self, tag: NewTag) -> Result<Tag> {
        self.client.insert(TAGS_TABLE, &tag).await
    }

    #[instrument(skip(self))]
    async fn delete_tag(&self, id: Uuid) -> Result<()> {
        self.client.delete(TASK_TAGS_TABLE, &[("tag_id", eq(id))]).await?;
        self.client.delete(TAGS_TABLE, &[("id", eq(id))]).await
    }

    async fn attach(&self, link: TaskTag) -> Result<()> {
        self.client.insert_ignoring_duplicates(TASK_TAGS_TABLE, &[link]).await
    }

    async fn detach(&self, link: TaskTag) -> Result<()> {
        self.client
            .delete(TASK_TAGS_TABLE, &[("task_id", eq(link.task_id)), ("tag_id", eq(link.tag_id))])
            .await
    }

    #[instrument(skip(self, task_ids), fields(batch_size = task_ids.len()))]
    async fn fetch_task_tags(&self, task_ids: &[Uuid]) -> Result<Vec<TaskTag>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let links: Vec<TaskTag> =
            self.client.select(TASK_TAGS_TABLE, &[("task_id", in_list(task_ids))]).await?;
        debug!(links = links.len(), "Fetched task tags");
        Ok(links)
    }
}
