//! Adapters for the hosted table store
//!
//! Every adapter shares one [`RestClient`], so a token refresh applies to all
//! of them at once.

pub mod plans;
pub mod projects;
pub mod rest;
pub mod server_time;
pub mod tags;
pub mod time_entries;

pub use plans::RestPlanProvider;
pub use projects::{RestProjectStore, RestTaskStore};
pub use rest::RestClient;
pub use server_time::ServerTimeClient;
pub use tags::RestTagStore;
pub use time_entries::RestTimeEntryStore;

pub(crate) const PROJECTS_TABLE: &str = "projects";
pub(crate) const TASKS_TABLE: &str = "tasks";
pub(crate) const TIME_ENTRIES_TABLE: &str = "time_entries";
pub(crate) const TAGS_TABLE: &str = "tags";
pub(crate) const TASK_TAGS_TABLE: &str = "task_tags";
pub(crate) const PROFILES_TABLE: &str = "profiles";
