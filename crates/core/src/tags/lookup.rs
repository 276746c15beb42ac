//! Batched, cached tag lookup per task.
//!
//! The first request for an uncached task opens a short batch window. Every
//! request arriving inside the window joins it, and one store call resolves
//! them all. Requests for a task whose fetch is already under way attach to
//! that fetch instead of opening another window. Results are kept in a TTL
//! cache that [`TagLookup::invalidate`] clears whenever tags change.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::join_all;
use parking_lot::Mutex;
use ticktally_common::cache::{CacheStats, TtlCache};
use ticktally_common::time::{Clock, SystemClock};
use ticktally_domain::TagConfig;
use tokio::sync::{broadcast, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::ports::TagStore;
use crate::events::{Notification, NotificationBus};

type Waiter = (Uuid, oneshot::Sender<Vec<Uuid>>);

/// Waiters not yet answered: the open window plus every fetch under way.
#[derive(Default)]
struct Batches {
    pending: Option<Vec<Waiter>>,
    /// Task id to the batch currently fetching it.
    in_flight: HashMap<Uuid, u64>,
    /// Waiters that arrived after their batch started fetching.
    late: HashMap<u64, Vec<Waiter>>,
    next_batch: u64,
}

impl Batches {
    /// Queue `task_id`. Returns true when a new window was opened.
    fn enqueue(&mut self, task_id: Uuid, sender: oneshot::Sender<Vec<Uuid>>) -> bool {
        if let Some(batch) = self.in_flight.get(&task_id) {
            debug!(%task_id, batch, "Joining in-flight tag batch");
            self.late.entry(*batch).or_default().push((task_id, sender));
            return false;
        }
        match self.pending.as_mut() {
            Some(waiters) => {
                waiters.push((task_id, sender));
                false
            }
            None => {
                self.pending = Some(vec![(task_id, sender)]);
                true
            }
        }
    }

    /// Take the open window and mark its tasks as in flight.
    fn start_fetch(&mut self) -> Option<(u64, Vec<Waiter>)> {
        let waiters = self.pending.take()?;
        let batch = self.next_batch;
        self.next_batch += 1;
        for (task_id, _) in &waiters {
            self.in_flight.insert(*task_id, batch);
        }
        Some((batch, waiters))
    }

    /// Release `batch` and hand back the waiters that joined it late.
    fn finish_fetch(&mut self, batch: u64) -> Vec<Waiter> {
        self.in_flight.retain(|_, owner| *owner != batch);
        self.late.remove(&batch).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagLookupConfig {
    pub batch_delay: Duration,
    pub cache_ttl: Duration,
}

impl From<&TagConfig> for TagLookupConfig {
    fn from(config: &TagConfig) -> Self {
        Self { batch_delay: config.batch_delay(), cache_ttl: config.cache_ttl() }
    }
}

impl Default for TagLookupConfig {
    fn default() -> Self {
        Self::from(&TagConfig::default())
    }
}

/// Handle to the lookup. Clones share the cache and the open batch.
pub struct TagLookup<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
}

struct Inner<C: Clock> {
    store: Arc<dyn TagStore>,
    cache: TtlCache<Uuid, Vec<Uuid>, C>,
    batches: Mutex<Batches>,
    generation: AtomicU64,
    batch_delay: Duration,
    bus: NotificationBus,
    shutdown: CancellationToken,
}

impl TagLookup<SystemClock> {
    pub fn new(store: Arc<dyn TagStore>, bus: NotificationBus, config: TagLookupConfig) -> Self {
        Self::with_clock(store, bus, config, SystemClock)
    }
}

impl<C: Clock> TagLookup<C> {
    /// Lookup whose cache expiry follows `clock`.
    pub fn with_clock(
        store: Arc<dyn TagStore>,
        bus: NotificationBus,
        config: TagLookupConfig,
        clock: C,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                cache: TtlCache::with_clock(config.cache_ttl, clock),
                batches: Mutex::new(Batches::default()),
                generation: AtomicU64::new(0),
                batch_delay: config.batch_delay,
                bus,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Tag ids attached to `task_id`.
    ///
    /// Never fails: a task without tags, or a batch whose fetch failed,
    /// resolves to an empty list.
    pub async fn get_tags(&self, task_id: Uuid) -> Vec<Uuid> {
        let (sender, receiver) = oneshot::channel();
        let opened = {
            let mut batches = self.inner.batches.lock();
            // Checked under the lock so a fetch finishing now is either
            // cached or still in flight.
            if let Some(tags) = self.inner.cache.get(&task_id) {
                return tags;
            }
            batches.enqueue(task_id, sender)
        };

        if opened {
            let inner = Arc::downgrade(&self.inner);
            let shutdown = self.inner.shutdown.clone();
            tokio::spawn(run_batch(inner, shutdown, self.inner.batch_delay));
        }

        // A dropped sender means the lookup went away before the batch ran.
        receiver.await.unwrap_or_default()
    }

    /// Resolve several tasks through the same batch window.
    pub async fn get_many(&self, task_ids: &[Uuid]) -> HashMap<Uuid, Vec<Uuid>> {
        let lookups = task_ids.iter().map(|task_id| async move {
            (*task_id, self.get_tags(*task_id).await)
        });
        join_all(lookups).await.into_iter().collect()
    }

    /// Cached tags without touching the store. `None` when absent or expired.
    pub fn cached_tags(&self, task_id: Uuid) -> Option<Vec<Uuid>> {
        self.inner.cache.get(&task_id)
    }

    /// Drop every cached association and announce the change.
    ///
    /// Batches already in flight still answer their waiters but no longer
    /// populate the cache or accept late joiners.
    pub fn invalidate(&self, task_id: Option<Uuid>) {
        {
            let mut batches = self.inner.batches.lock();
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            batches.in_flight.clear();
        }
        self.inner.cache.invalidate_all();
        debug!(task_id = ?task_id, "Tag cache invalidated");
        self.inner.bus.publish(Notification::TaskTagsModified { task_id });
    }

    /// Notifications from the shared bus; consumers react to
    /// `task-tags-modified`.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.bus.subscribe()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }
}

impl<C: Clock> Clone for TagLookup<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: Clock> Drop for Inner<C> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_batch<C: Clock>(inner: Weak<Inner<C>>, shutdown: CancellationToken, delay: Duration) {
    tokio::select! {
        _ = shutdown.cancelled() => return,
        _ = tokio::time::sleep(delay) => {}
    }
    let Some(inner) = inner.upgrade() else {
        return;
    };
    inner.flush().await;
}

impl<C: Clock> Inner<C> {
    async fn flush(&self) {
        let (batch, generation, waiters) = {
            let mut batches = self.batches.lock();
            let Some((batch, waiters)) = batches.start_fetch() else {
                return;
            };
            (batch, self.generation.load(Ordering::SeqCst), waiters)
        };

        let mut task_ids: Vec<Uuid> = waiters.iter().map(|(task_id, _)| *task_id).collect();
        task_ids.sort_unstable();
        task_ids.dedup();

        let mut results: HashMap<Uuid, Vec<Uuid>> =
            task_ids.iter().map(|task_id| (*task_id, Vec::new())).collect();

        match self.store.fetch_task_tags(&task_ids).await {
            Ok(links) => {
                for link in links {
                    if let Some(tags) = results.get_mut(&link.task_id) {
                        if !tags.contains(&link.tag_id) {
                            tags.push(link.tag_id);
                        }
                    }
                }
                if self.generation.load(Ordering::SeqCst) == generation {
                    self.cache.insert_many(results.iter().map(|(id, tags)| (*id, tags.clone())));
                } else {
                    debug!(batch_size = task_ids.len(), "Tags changed mid-fetch; batch not cached");
                }
                debug!(batch_size = task_ids.len(), waiters = waiters.len(), "Tag batch resolved");
            }
            Err(err) => {
                warn!(batch_size = task_ids.len(), error = %err, "Tag batch fetch failed");
            }
        }

        let late = self.batches.lock().finish_fetch(batch);
        for (task_id, sender) in waiters.into_iter().chain(late) {
            let _ = sender.send(results.get(&task_id).cloned().unwrap_or_default());
        }
    }
}
