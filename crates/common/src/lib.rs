//! Common utilities shared across TickTally crates.
//!
//! - [`time`]: clock abstraction (system, mock, server-offset) and duration
//!   formatting
//! - [`cache`]: clock-driven TTL cache with hit/miss statistics

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod time;

pub use cache::{CacheStats, TtlCache};
pub use time::{format_clock, format_duration, Clock, MockClock, OffsetClock, SystemClock};
