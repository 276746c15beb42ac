//! # TickTally Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - REST adapters for the hosted table store (projects, tasks, time entries,
//!   tags, plans) and the server time endpoint
//! - SQLite-backed local timer cache
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `ticktally-core`
//! - Contains all "impure" code (I/O, network, filesystem)

pub mod config;
pub mod errors;
pub mod http;
pub mod local_cache;
pub mod observability;
pub mod store;

// Re-export commonly used items
pub use errors::{status_error, InfraError};
pub use http::{HttpClient, HttpClientBuilder};
pub use local_cache::SqliteLocalCache;
pub use observability::init_tracing;
pub use store::{
    RestClient, RestPlanProvider, RestProjectStore, RestTagStore, RestTaskStore,
    RestTimeEntryStore, ServerTimeClient,
};
