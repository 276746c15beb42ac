//! Change notifications shared between the timer, tag lookup and display
//! components.
//!
//! The bus is an explicit object created by whoever wires the services
//! together and handed to each producer and consumer. Delivery is
//! best-effort: publishing with no subscribers is not an error and slow
//! subscribers observe `Lagged` instead of blocking producers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ticktally_domain::constants::{
    EVENT_TASK_COMPLETED, EVENT_TASK_TAGS_MODIFIED, EVENT_TIMER_PAUSED, EVENT_TIMER_RESUMED,
    EVENT_TIMER_STARTED, EVENT_TIMER_STOPPED, NOTIFICATION_CHANNEL_CAPACITY,
};
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

/// A named change event with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Notification {
    TimerStarted {
        entry_id: Uuid,
        task_id: Uuid,
        project_id: Uuid,
        start_time: DateTime<Utc>,
    },
    /// `elapsed_seconds` is the frozen value displays should show.
    TimerPaused { entry_id: Uuid, elapsed_seconds: i64 },
    TimerResumed {
        entry_id: Uuid,
        start_time: DateTime<Utc>,
        paused_seconds: i64,
        elapsed_seconds: i64,
    },
    TimerStopped { entry_id: Uuid, duration_seconds: i64 },
    TaskCompleted { task_id: Uuid, elapsed_seconds: i64 },
    /// `None` when the change is not scoped to a single task (e.g. a tag was
    /// deleted).
    TaskTagsModified { task_id: Option<Uuid> },
}

impl Notification {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TimerStarted { .. } => EVENT_TIMER_STARTED,
            Self::TimerPaused { .. } => EVENT_TIMER_PAUSED,
            Self::TimerResumed { .. } => EVENT_TIMER_RESUMED,
            Self::TimerStopped { .. } => EVENT_TIMER_STOPPED,
            Self::TaskCompleted { .. } => EVENT_TASK_COMPLETED,
            Self::TaskTagsModified { .. } => EVENT_TASK_TAGS_MODIFIED,
        }
    }

    /// Entry id carried by timer events.
    pub fn entry_id(&self) -> Option<Uuid> {
        match self {
            Self::TimerStarted { entry_id, .. }
            | Self::TimerPaused { entry_id, .. }
            | Self::TimerResumed { entry_id, .. }
            | Self::TimerStopped { entry_id, .. } => Some(*entry_id),
            Self::TaskCompleted { .. } | Self::TaskTagsModified { .. } => None,
        }
    }
}

/// Broadcast channel for [`Notification`]s.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to every current subscriber and return how many received it.
    pub fn publish(&self, notification: Notification) -> usize {
        let name = notification.name();
        match self.sender.send(notification) {
            Ok(receivers) => {
                trace!(event = name, receivers, "notification published");
                receivers
            }
            Err(_) => {
                trace!(event = name, "notification dropped: no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(NOTIFICATION_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let bus = NotificationBus::default();
        assert_eq!(bus.publish(Notification::TaskTagsModified { task_id: None }), 0);
    }

    #[tokio::test]
    async fn every_subscriber_receives_the_event() {
        let bus = NotificationBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        let entry_id = Uuid::new_v4();

        let delivered = bus.publish(Notification::TimerPaused { entry_id, elapsed_seconds: 10 });

        assert_eq!(delivered, 2);
        assert_eq!(first.recv().await.unwrap().entry_id(), Some(entry_id));
        assert_eq!(second.recv().await.unwrap().name(), "timer-paused");
    }

    #[test]
    fn serializes_with_kebab_case_event_name() {
        let json = serde_json::to_value(Notification::TaskTagsModified { task_id: None }).unwrap();
        assert_eq!(json["event"], "task-tags-modified");
    }
}
