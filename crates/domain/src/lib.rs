//! # TickTally Domain
//!
//! Business domain types for TickTally.
//!
//! This crate contains:
//! - Entity types (Project, Task, TimeEntry, Tag, Plan)
//! - Domain error type and `Result` alias
//! - Configuration structures
//! - Shared constants (event names, timer defaults)
//!
//! ## Architecture
//! - No dependencies on other TickTally crates
//! - Only external dependencies allowed
//! - Pure data structures and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
