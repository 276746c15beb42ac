//! Application constants
//!
//! Centralized location for domain-level constants shared by the timer,
//! the tag lookup and the notification bus.

// Timer display
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

// Tag lookup batching
pub const DEFAULT_TAG_BATCH_DELAY_MS: u64 = 50;
pub const DEFAULT_TAG_CACHE_TTL_SECS: u64 = 30;

// Remote store
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

// Notification bus
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 64;
pub const EVENT_TIMER_STARTED: &str = "timer-started";
pub const EVENT_TIMER_PAUSED: &str = "timer-paused";
pub const EVENT_TIMER_RESUMED: &str = "timer-resumed";
pub const EVENT_TIMER_STOPPED: &str = "timer-stopped";
pub const EVENT_TASK_COMPLETED: &str = "task-completed";
pub const EVENT_TASK_TAGS_MODIFIED: &str = "task-tags-modified";

// Local cache
pub const LOCAL_CACHE_TIMER_KEY: &str = "active-timer";

pub const SECONDS_PER_HOUR: f64 = 3600.0;
