use std::sync::Arc;

use async_trait::async_trait;
use ticktally_core::TimeEntryStore;
use ticktally_domain::{NewTimeEntry, Result, TimeEntry, TimeEntryPatch};
use tracing::instrument;
use uuid::Uuid;

use super::rest::RestClient;
use super::TIME_ENTRIES_TABLE;

/// `time_entries` rows of the signed-in owner.
pub struct RestTimeEntryStore {
    client: Arc<RestClient>,
}

impl RestTimeEntryStore {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TimeEntryStore for RestTimeEntryStore {
    #[instrument(skip(self, entry), fields(task_id = %entry.task_id))]
    async fn create(&self, entry: NewTimeEntry) -> Result<TimeEntry> {
        self.client.insert(TIME_ENTRIES_TABLE, &entry).await
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: Uuid, patch: TimeEntryPatch) -> Result<TimeEntry> {
        self.client.update(TIME_ENTRIES_TABLE, id, &patch).await
    }

    async fn list(&self) -> Result<Vec<TimeEntry>> {
        self.client.select(TIME_ENTRIES_TABLE, &[("order", "start_time.desc".to_string())]).await
    }
}
