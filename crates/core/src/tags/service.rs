//! Tag management. Every change invalidates the tag lookup so cached
//! associations never outlive a modification made through this service.

use std::sync::Arc;

use ticktally_common::time::Clock;
use ticktally_domain::{NewTag, Result, Tag, TaskTag, TickTallyError};
use tracing::info;
use uuid::Uuid;

use super::lookup::TagLookup;
use super::ports::TagStore;

pub struct TagService<C: Clock> {
    store: Arc<dyn TagStore>,
    lookup: TagLookup<C>,
}

impl<C: Clock> TagService<C> {
    pub fn new(store: Arc<dyn TagStore>, lookup: TagLookup<C>) -> Self {
        Self { store, lookup }
    }

    pub fn lookup(&self) -> &TagLookup<C> {
        &self.lookup
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.store.list_tags().await
    }

    pub async fn create_tag(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TickTallyError::InvalidInput("tag.name must not be empty".into()));
        }
        let tag = self.store.create_tag(NewTag { name: name.to_string() }).await?;
        info!(tag_id = %tag.id, "Tag created");
        Ok(tag)
    }

    pub async fn delete_tag(&self, tag_id: Uuid) -> Result<()> {
        self.store.delete_tag(tag_id).await?;
        self.lookup.invalidate(None);
        info!(%tag_id, "Tag deleted");
        Ok(())
    }

    pub async fn attach(&self, task_id: Uuid, tag_id: Uuid) -> Result<()> {
        self.store.attach(TaskTag { task_id, tag_id }).await?;
        self.lookup.invalidate(Some(task_id));
        Ok(())
    }

    pub async fn detach(&self, task_id: Uuid, tag_id: Uuid) -> Result<()> {
        self.store.detach(TaskTag { task_id, tag_id }).await?;
        self.lookup.invalidate(Some(task_id));
        Ok(())
    }

    /// Tags of `task_id` through the batched lookup.
    pub async fn tags_for_task(&self, task_id: Uuid) -> Vec<Uuid> {
        self.lookup.get_tags(task_id).await
    }
}
