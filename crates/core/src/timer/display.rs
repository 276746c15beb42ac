//! Display-side elapsed time.
//!
//! A `TimerDisplay` owns its own copy of the elapsed value. While the timer
//! runs it recomputes the value on a periodic tick; on pause or stop it drops
//! the tick and adopts the exact value carried by the notification.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ticktally_common::time::{Clock, SystemClock};
use ticktally_domain::{CachedTimerState, TimeEntry, TimerStatus};
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::duration::{cached_elapsed_seconds, elapsed_seconds, entry_elapsed_seconds};
use crate::events::Notification;

pub struct TimerDisplay<C: Clock + Clone = SystemClock> {
    clock: C,
    tick_interval: Duration,
    entry_id: Option<Uuid>,
    status: TimerStatus,
    elapsed: Arc<watch::Sender<i64>>,
    // Bumped whenever an exact value is adopted; stale ticks check it.
    epoch: Arc<AtomicU64>,
    tick: Option<CancellationToken>,
}

impl<C: Clock + Clone> TimerDisplay<C> {
    pub fn new(clock: C, tick_interval: Duration) -> Self {
        let (elapsed, _) = watch::channel(0);
        Self {
            clock,
            tick_interval,
            entry_id: None,
            status: TimerStatus::Idle,
            elapsed: Arc::new(elapsed),
            epoch: Arc::new(AtomicU64::new(0)),
            tick: None,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn entry_id(&self) -> Option<Uuid> {
        self.entry_id
    }

    pub fn elapsed(&self) -> i64 {
        *self.elapsed.borrow()
    }

    /// Receiver that observes every elapsed update.
    pub fn watch(&self) -> watch::Receiver<i64> {
        self.elapsed.subscribe()
    }

    pub fn is_ticking(&self) -> bool {
        self.tick.is_some()
    }

    /// Paint from the local mirror before the store has answered.
    pub fn hydrate_from_cache(&mut self, state: &CachedTimerState) {
        self.entry_id = Some(state.entry_id);
        if state.is_paused {
            self.status = TimerStatus::Paused;
            self.freeze(cached_elapsed_seconds(state, self.clock.utc_now()));
        } else {
            self.status = TimerStatus::Running;
            self.start_ticking(state.start_time, state.paused_seconds);
        }
    }

    /// Adopt the reconciled entry (or idle) returned by a restore.
    pub fn hydrate(&mut self, entry: Option<&TimeEntry>) {
        let Some(entry) = entry else {
            self.entry_id = None;
            self.status = TimerStatus::Idle;
            self.freeze(0);
            return;
        };
        self.entry_id = Some(entry.id);
        self.status = entry.status();
        match self.status {
            TimerStatus::Running => self.start_ticking(entry.start_time, entry.paused_seconds),
            TimerStatus::Paused | TimerStatus::Idle => {
                self.freeze(entry_elapsed_seconds(entry, self.clock.utc_now()))
            }
        }
    }

    pub fn apply(&mut self, notification: &Notification) {
        match notification {
            Notification::TimerStarted { entry_id, start_time, .. } => {
                self.entry_id = Some(*entry_id);
                self.status = TimerStatus::Running;
                self.start_ticking(*start_time, 0);
            }
            Notification::TimerResumed { entry_id, start_time, paused_seconds, .. } => {
                self.entry_id = Some(*entry_id);
                self.status = TimerStatus::Running;
                self.start_ticking(*start_time, *paused_seconds);
            }
            Notification::TimerPaused { entry_id, elapsed_seconds } => {
                if !self.tracks(*entry_id) {
                    return;
                }
                self.entry_id = Some(*entry_id);
                self.status = TimerStatus::Paused;
                self.freeze(*elapsed_seconds);
            }
            Notification::TimerStopped { entry_id, duration_seconds } => {
                if !self.tracks(*entry_id) {
                    return;
                }
                self.entry_id = None;
                self.status = TimerStatus::Idle;
                self.freeze(*duration_seconds);
            }
            Notification::TaskCompleted { .. } | Notification::TaskTagsModified { .. } => {}
        }
    }

    /// Apply notifications from `events` until the bus closes or `shutdown`
    /// fires.
    pub async fn run(
        &mut self,
        mut events: broadcast::Receiver<Notification>,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                received = events.recv() => match received {
                    Ok(notification) => self.apply(&notification),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Timer display lagged behind notifications");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
        self.stop_ticking();
    }

    fn tracks(&self, entry_id: Uuid) -> bool {
        match self.entry_id {
            Some(current) if current != entry_id => {
                debug!(%entry_id, %current, "Ignoring notification for another entry");
                false
            }
            _ => true,
        }
    }

    fn freeze(&mut self, elapsed: i64) {
        self.stop_ticking();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.elapsed.send_replace(elapsed.max(0));
    }

    fn start_ticking(&mut self, start_time: DateTime<Utc>, paused_seconds: i64) {
        self.stop_ticking();
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.clock.utc_now();
        self.elapsed.send_replace(elapsed_seconds(start_time, now, paused_seconds));

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let clock = self.clock.clone();
        let sender = Arc::clone(&self.elapsed);
        let current_epoch = Arc::clone(&self.epoch);
        let period = self.tick_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        let elapsed = elapsed_seconds(start_time, clock.utc_now(), paused_seconds);
                        sender.send_if_modified(|value| {
                            if current_epoch.load(Ordering::SeqCst) != epoch || *value == elapsed {
                                return false;
                            }
                            *value = elapsed;
                            true
                        });
                    }
                }
            }
        });
        self.tick = Some(token);
    }

    fn stop_ticking(&mut self) {
        if let Some(token) = self.tick.take() {
            token.cancel();
        }
    }
}

impl<C: Clock + Clone> Drop for TimerDisplay<C> {
    fn drop(&mut self) {
        self.stop_ticking();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ticktally_common::time::MockClock;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn started(entry_id: Uuid) -> Notification {
        Notification::TimerStarted {
            entry_id,
            task_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            start_time: t0(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_while_running_and_freezes_on_pause() {
        let clock = MockClock::at(t0());
        let mut display = TimerDisplay::new(clock.clone(), Duration::from_secs(1));
        let entry_id = Uuid::new_v4();

        display.apply(&started(entry_id));
        assert!(display.is_ticking());
        assert_eq!(display.status(), TimerStatus::Running);

        clock.advance_secs(3);
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(display.elapsed(), 3);

        display.apply(&Notification::TimerPaused { entry_id, elapsed_seconds: 3 });
        assert!(!display.is_ticking());

        clock.advance_secs(10);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(display.elapsed(), 3);
        assert_eq!(display.status(), TimerStatus::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn resume_continues_from_paused_total() {
        let clock = MockClock::at(t0());
        let mut display = TimerDisplay::new(clock.clone(), Duration::from_secs(1));
        let entry_id = Uuid::new_v4();

        clock.advance_secs(40);
        display.apply(&Notification::TimerResumed {
            entry_id,
            start_time: t0(),
            paused_seconds: 30,
            elapsed_seconds: 10,
        });
        assert_eq!(display.elapsed(), 10);

        clock.advance_secs(5);
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(display.elapsed(), 15);
    }

    #[tokio::test]
    async fn stop_adopts_final_duration() {
        let clock = MockClock::at(t0());
        let mut display = TimerDisplay::new(clock, Duration::from_secs(1));
        let entry_id = Uuid::new_v4();

        display.apply(&started(entry_id));
        display.apply(&Notification::TimerStopped { entry_id, duration_seconds: 20 });

        assert!(!display.is_ticking());
        assert_eq!(display.status(), TimerStatus::Idle);
        assert_eq!(display.elapsed(), 20);
        assert_eq!(display.entry_id(), None);
    }

    #[tokio::test]
    async fn ignores_events_for_other_entries() {
        let clock = MockClock::at(t0());
        let mut display = TimerDisplay::new(clock, Duration::from_secs(1));
        let entry_id = Uuid::new_v4();

        display.apply(&started(entry_id));
        display.apply(&Notification::TimerPaused { entry_id: Uuid::new_v4(), elapsed_seconds: 99 });

        assert_eq!(display.status(), TimerStatus::Running);
        assert!(display.is_ticking());
    }

    #[tokio::test]
    async fn hydrates_paused_state_from_cache() {
        let clock = MockClock::at(t0() + chrono::Duration::seconds(500));
        let mut display = TimerDisplay::new(clock, Duration::from_secs(1));
        let state = CachedTimerState {
            entry_id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            start_time: t0(),
            is_paused: true,
            paused_seconds: 30,
            paused_at: Some(t0() + chrono::Duration::seconds(70)),
            elapsed_seconds: 40,
            saved_at: t0() + chrono::Duration::seconds(70),
        };

        display.hydrate_from_cache(&state);

        assert_eq!(display.status(), TimerStatus::Paused);
        assert_eq!(display.elapsed(), 40);
        assert!(!display.is_ticking());
    }

    #[tokio::test]
    async fn run_applies_queued_events_until_bus_closes() {
        let bus = crate::events::NotificationBus::default();
        let clock = MockClock::at(t0());
        let mut display = TimerDisplay::new(clock, Duration::from_secs(1));
        let entry_id = Uuid::new_v4();

        let events = bus.subscribe();
        bus.publish(started(entry_id));
        bus.publish(Notification::TimerPaused { entry_id, elapsed_seconds: 7 });
        drop(bus);

        display.run(events, CancellationToken::new()).await;

        assert_eq!(display.elapsed(), 7);
        assert_eq!(display.status(), TimerStatus::Paused);
        assert!(!display.is_ticking());
    }
}
