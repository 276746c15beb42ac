//! Time-to-live cache driven by an injectable clock
//!
//! Entries expire a fixed duration after insertion. Expiry is checked lazily
//! on read; [`TtlCache::cleanup_expired`] sweeps eagerly.
//!
//! ```
//! use std::time::Duration;
//!
//! use ticktally_common::cache::TtlCache;
//! use ticktally_common::time::MockClock;
//!
//! let clock = MockClock::new();
//! let cache: TtlCache<&str, u32, MockClock> =
//!     TtlCache::with_clock(Duration::from_secs(30), clock.clone());
//!
//! cache.insert("task-a", 2);
//! assert_eq!(cache.get(&"task-a"), Some(2));
//!
//! clock.advance(Duration::from_secs(30));
//! assert_eq!(cache.get(&"task-a"), None);
//! ```

mod stats;
mod ttl;

pub use stats::CacheStats;
pub use ttl::TtlCache;
