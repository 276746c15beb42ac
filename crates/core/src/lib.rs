//! # TickTally Core
//!
//! Client-side business logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the hosted store, local cache, plans and
//!   user notifications
//! - The timer state machine and its display ticker
//! - The tag lookup batcher
//! - Project/task/tag services and earnings reports
//!
//! ## Architecture Principles
//! - Only depends on `ticktally-domain` and `ticktally-common`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Collaborators (bus, caches, clock) are injected, never global

pub mod billing;
pub mod events;
pub mod notifier;
pub mod projects;
pub mod tags;
pub mod timer;

// Re-export specific items to avoid ambiguity
pub use billing::earnings::{build_project_report, earnings, ProjectReport, TaskLine};
pub use billing::plans::PlanProvider;
pub use events::{Notification, NotificationBus};
pub use notifier::{LogNotifier, UserNotifier};
pub use projects::ports::{ProjectStore, TaskStore};
pub use projects::ProjectService;
pub use tags::ports::TagStore;
pub use tags::{TagLookup, TagLookupConfig, TagService};
pub use timer::ports::{LocalTimerCache, TimeEntryStore};
pub use timer::{TimerDisplay, TimerService};
