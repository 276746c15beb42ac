//! Pure elapsed-time arithmetic for timer sessions.
//!
//! All values are whole seconds. Negative spans (clock skew between the
//! store's timestamps and the local clock) clamp to zero.

use chrono::{DateTime, Utc};
use ticktally_domain::{CachedTimerState, TimeEntry};

/// Whole seconds from `from` to `to`, never negative.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().max(0)
}

/// `now - start - paused_seconds`, never negative.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>, paused_seconds: i64) -> i64 {
    (seconds_between(start, now) - paused_seconds.max(0)).max(0)
}

/// Length of the pause that began at `paused_at`.
pub fn paused_gap_seconds(paused_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    seconds_between(paused_at, now)
}

/// Elapsed seconds of `entry` as observed at `now`.
///
/// Paused entries report the value frozen at `paused_at`; finished entries
/// report their stored duration when present.
pub fn entry_elapsed_seconds(entry: &TimeEntry, now: DateTime<Utc>) -> i64 {
    if !entry.is_running {
        if let Some(duration) = entry.duration_seconds {
            return duration.max(0);
        }
        let end = entry.end_time.unwrap_or(now);
        return elapsed_seconds(entry.start_time, end, entry.paused_seconds);
    }
    match (entry.is_paused, entry.paused_at) {
        (true, Some(paused_at)) => elapsed_seconds(entry.start_time, paused_at, entry.paused_seconds),
        _ => elapsed_seconds(entry.start_time, now, entry.paused_seconds),
    }
}

/// Elapsed seconds reconstructed from the local mirror without the store.
pub fn cached_elapsed_seconds(state: &CachedTimerState, now: DateTime<Utc>) -> i64 {
    match (state.is_paused, state.paused_at) {
        (true, Some(paused_at)) => elapsed_seconds(state.start_time, paused_at, state.paused_seconds),
        (true, None) => state.elapsed_seconds.max(0),
        (false, _) => elapsed_seconds(state.start_time, now, state.paused_seconds),
    }
}

/// `paused_seconds` after folding in the pause that is still open at `now`.
pub fn paused_seconds_at(entry: &TimeEntry, now: DateTime<Utc>) -> i64 {
    match (entry.is_paused, entry.paused_at) {
        (true, Some(paused_at)) => entry.paused_seconds + paused_gap_seconds(paused_at, now),
        _ => entry.paused_seconds,
    }
}
