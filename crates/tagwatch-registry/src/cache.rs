//! In-memory tag cache with TTL freshness and a background sweep.
//!
//! Entries are keyed by image URL and replaced wholesale on refresh. Every
//! access goes through one reader/writer lock: lookups share it, stores and
//! sweeps take it exclusively.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tagwatch_core::ImageTag;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A cached tag list and the time it was fetched.
#[derive(Debug, Clone)]
struct CacheEntry {
    inserted_at: Instant,
    tags: Arc<[ImageTag]>,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) < ttl
    }
}

/// Cache of tag lists keyed by image URL.
///
/// Lookups hand out shared read-only views of the tag list, so a later
/// refresh never changes a list a caller already holds.
#[derive(Debug)]
pub struct TagCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl TagCache {
    /// Creates an empty cache whose entries stay fresh for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the time-to-live of cache entries.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached tags for `image_url` if they are younger than the TTL.
    #[must_use]
    pub fn get(&self, image_url: &str) -> Option<Arc<[ImageTag]>> {
        let now = Instant::now();
        let entries = self.entries.read();
        match entries.get(image_url) {
            Some(entry) if entry.is_fresh(now, self.ttl) => {
                tracing::debug!(image_url, "Cache hit");
                Some(Arc::clone(&entry.tags))
            }
            Some(_) => {
                tracing::debug!(image_url, "Cache entry expired");
                None
            }
            None => {
                tracing::debug!(image_url, "Cache miss");
                None
            }
        }
    }

    /// Stores `tags` for `image_url`, replacing any previous entry.
    ///
    /// Returns the stored view of the tag list.
    pub fn insert(&self, image_url: &str, tags: impl Into<Arc<[ImageTag]>>) -> Arc<[ImageTag]> {
        let tags = tags.into();
        let entry = CacheEntry {
            inserted_at: Instant::now(),
            tags: Arc::clone(&tags),
        };
        self.entries.write().insert(image_url.to_string(), entry);
        tracing::debug!(image_url, count = tags.len(), "Committed image tags");
        tags
    }

    /// Removes the entry for `image_url`, returning true if one existed.
    pub fn remove(&self, image_url: &str) -> bool {
        self.entries.write().remove(image_url).is_some()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes every entry whose age at `now` is at least the TTL.
    ///
    /// Returns the number of evicted entries.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now, self.ttl));
        let evicted = before - entries.len();
        drop(entries);

        tracing::debug!(evicted, "Swept tag cache");
        evicted
    }

    /// Returns the number of entries, stale or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Spawns a task that sweeps the cache every `interval`.
    ///
    /// The task runs until [`SweeperHandle::shutdown`] is called or the
    /// handle is dropped. Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let cache = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(?interval, "Tag cache sweeper started");

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    now = ticker.tick() => {
                        cache.sweep(now);
                    }
                }
            }

            tracing::debug!("Tag cache sweeper stopped");
        });

        SweeperHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }
}

/// Handle to a running cache sweeper.
///
/// Dropping the handle also stops the sweeper.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!(error = %e, "Tag cache sweeper exited abnormally");
        }
    }

    /// Returns true once the sweeper task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
