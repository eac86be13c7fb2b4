//! Request Deduplicator Module
//!
//! Collapses concurrent requests for the same key into a single
//! in-flight producer call whose result every caller shares.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use crate::catalog::{Clock, DEFAULT_DEDUP_TIMEOUT_SECS};
use crate::error::{CatalogError, Result};

type SharedResult<T> = Shared<BoxFuture<'static, Result<T>>>;

// == Pending Entry ==
/// A registered in-flight request.
struct PendingEntry<T> {
    /// Distinguishes a registration from its replacement under the same key
    id: u64,
    started_at: DateTime<Utc>,
    future: SharedResult<T>,
}

type PendingTable<T> = Arc<Mutex<HashMap<String, PendingEntry<T>>>>;

// == Request Deduplicator ==
/// Keyed single-flight table.
///
/// The producer runs on its own task, so it finishes (and its
/// registration is removed) even if every caller stops waiting.
pub struct RequestDeduplicator<T> {
    pending: PendingTable<T>,
    next_id: AtomicU64,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl<T> RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a deduplicator whose registrations expire after `timeout`.
    pub fn new(timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            timeout,
            clock,
        }
    }

    /// Creates a deduplicator with the default 30 second timeout.
    pub fn with_default_timeout(clock: Arc<dyn Clock>) -> Self {
        Self::new(Duration::seconds(DEFAULT_DEDUP_TIMEOUT_SECS), clock)
    }

    // == Execute ==
    /// Runs `producer` unless a live request for `key` is already in flight,
    /// in which case its result is awaited instead.
    ///
    /// A registration older than the timeout is evicted and a new producer
    /// call starts, even if the old one never settled.
    pub async fn execute<F, Fut>(&self, key: &str, producer: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let shared = {
            let mut table = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            let now = self.clock.now();

            match table.get(key) {
                Some(entry) if now - entry.started_at <= self.timeout => {
                    debug!("Joining in-flight request for key '{}'", key);
                    entry.future.clone()
                }
                Some(entry) => {
                    warn!(
                        "Evicting request for key '{}' pending since {}",
                        key, entry.started_at
                    );
                    table.remove(key);
                    self.register(&mut table, key, now, producer)
                }
                None => self.register(&mut table, key, now, producer),
            }
        };

        shared.await
    }

    /// Spawns the producer and records it under `key`.
    fn register<F, Fut>(
        &self,
        table: &mut HashMap<String, PendingEntry<T>>,
        key: &str,
        now: DateTime<Utc>,
        producer: F,
    ) -> SharedResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);
        let owned_key = key.to_string();
        let work = producer();

        let handle = tokio::spawn(async move {
            let result = work.await;
            let mut table = pending.lock().unwrap_or_else(PoisonError::into_inner);
            // Only drop our own registration, not a replacement.
            if table.get(&owned_key).map(|entry| entry.id) == Some(id) {
                table.remove(&owned_key);
            }
            result
        });

        let future = async move {
            handle.await.unwrap_or_else(|err| {
                Err(CatalogError::ServerFailure(format!(
                    "fetch task did not complete: {}",
                    err
                )))
            })
        }
        .boxed()
        .shared();

        debug!("Starting request for key '{}'", key);
        table.insert(
            key.to_string(),
            PendingEntry {
                id,
                started_at: now,
                future: future.clone(),
            },
        );
        future
    }

    // == In Flight ==
    /// Number of registered requests.
    pub fn in_flight(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether a request is registered under `key`.
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl<T> std::fmt::Debug for RequestDeduplicator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let in_flight = self
            .pending
            .lock()
            .map(|table| table.len())
            .unwrap_or_default();
        f.debug_struct("RequestDeduplicator")
            .field("in_flight", &in_flight)
            .field("timeout", &self.timeout)
            .finish()
    }
}
