//! Clock abstraction for deterministic time handling
//!
//! Timer arithmetic and cache expiry read time through [`Clock`] so tests can
//! drive it with [`MockClock`] and production can align with the backend via
//! [`OffsetClock`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Source of monotonic and wall-clock time
pub trait Clock: Send + Sync + 'static {
    /// Monotonic instant, for measuring durations
    fn now(&self) -> Instant;

    /// Wall clock time
    fn system_time(&self) -> SystemTime;

    /// Milliseconds since the UNIX epoch
    fn millis_since_epoch(&self) -> u64 {
        self.system_time().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
    }

    /// Wall clock time as a UTC timestamp
    fn utc_now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.system_time())
    }
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn system_time(&self) -> SystemTime {
        (**self).system_time()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same elapsed counter, so a clock handed to a service can
/// be advanced from the test body.
///
/// ```
/// use std::time::Duration;
///
/// use ticktally_common::time::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(5));
/// assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
    base_system_time: SystemTime,
}

impl MockClock {
    /// Mock clock whose wall time starts at the real current time
    pub fn new() -> Self {
        Self::starting_at(SystemTime::now())
    }

    /// Mock clock whose wall time starts at `at`
    pub fn at(at: DateTime<Utc>) -> Self {
        Self::starting_at(SystemTime::from(at))
    }

    fn starting_at(base_system_time: SystemTime) -> Self {
        Self { start: Instant::now(), elapsed: Arc::new(Mutex::new(Duration::ZERO)), base_system_time }
    }

    /// Simulate `duration` passing without waiting
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Set the absolute simulated elapsed time
    pub fn set_elapsed(&self, duration: Duration) {
        *self.elapsed.lock() = duration;
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }

    fn system_time(&self) -> SystemTime {
        self.base_system_time + *self.elapsed.lock()
    }
}

/// Wraps a clock and shifts its wall time by an offset measured against the
/// backend's time endpoint. Monotonic time is left untouched.
#[derive(Debug, Clone)]
pub struct OffsetClock<C: Clock = SystemClock> {
    inner: C,
    offset_ms: Arc<AtomicI64>,
}

impl<C: Clock> OffsetClock<C> {
    pub fn new(inner: C) -> Self {
        Self { inner, offset_ms: Arc::new(AtomicI64::new(0)) }
    }

    /// Replace the offset (server time minus local time)
    pub fn set_offset(&self, offset: chrono::Duration) {
        self.offset_ms.store(offset.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn offset(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.offset_ms.load(Ordering::SeqCst))
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: Clock> Clock for OffsetClock<C> {
    fn now(&self) -> Instant {
        self.inner.now()
    }

    fn system_time(&self) -> SystemTime {
        let base = self.inner.system_time();
        let offset_ms = self.offset_ms.load(Ordering::SeqCst);
        let shift = Duration::from_millis(offset_ms.unsigned_abs());
        if offset_ms >= 0 {
            base + shift
        } else {
            base.checked_sub(shift).unwrap_or(UNIX_EPOCH)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn mock_clock_starts_at_given_instant() {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let clock = MockClock::at(at);
        assert_eq!(clock.utc_now(), at);

        clock.advance_secs(90);
        assert_eq!(clock.utc_now(), at + chrono::Duration::seconds(90));
        assert_eq!(clock.elapsed(), Duration::from_secs(90));
    }

    #[test]
    fn mock_clock_clones_share_time() {
        let clock = MockClock::new();
        let handle = clock.clone();
        let before = clock.now();
        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.now().duration_since(before), Duration::from_millis(250));
    }

    #[test]
    fn offset_clock_shifts_wall_time_both_ways() {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let clock = OffsetClock::new(MockClock::at(at));

        clock.set_offset(chrono::Duration::seconds(3));
        assert_eq!(clock.utc_now(), at + chrono::Duration::seconds(3));

        clock.set_offset(chrono::Duration::milliseconds(-1500));
        assert_eq!(clock.utc_now(), at - chrono::Duration::milliseconds(1500));
        assert_eq!(clock.offset(), chrono::Duration::milliseconds(-1500));
    }

    #[test]
    fn offset_clock_leaves_monotonic_time_alone() {
        let mock = MockClock::new();
        let clock = OffsetClock::new(mock.clone());
        clock.set_offset(chrono::Duration::hours(1));
        assert_eq!(clock.now(), mock.now());
    }
}
