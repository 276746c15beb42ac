//! Domain types and models

pub mod plan;
pub mod project;
pub mod tag;
pub mod task;
pub mod time_entry;

pub use plan::{PlanTier, UserPlan};
pub use project::{NewProject, Project, ProjectPatch};
pub use tag::{NewTag, Tag, TaskTag};
pub use task::{NewTask, Task, TaskPatch};
pub use time_entry::{CachedTimerState, NewTimeEntry, TimeEntry, TimeEntryPatch, TimerStatus};
