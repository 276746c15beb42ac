//! Time utilities and abstractions
//!
//! - **Clock abstractions**: real, mock and server-offset clocks
//! - **[`format`]**: human-readable and stopwatch-style duration formatting
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use ticktally_common::time::{format_clock, format_duration, Clock, MockClock};
//!
//! assert_eq!(format_duration(Duration::from_secs(3665)), "1h 1m 5s");
//! assert_eq!(format_clock(3665), "01:01:05");
//!
//! let clock = MockClock::new();
//! let start = clock.utc_now();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!((clock.utc_now() - start).num_seconds(), 5);
//! ```

pub mod clock;
pub mod format;

pub use clock::{Clock, MockClock, OffsetClock, SystemClock};
pub use format::{format_clock, format_duration};
