//! Background Refresh Task
//!
//! Silently refreshes stale catalog data on a fixed period and whenever
//! the host becomes visible again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogCache, DEFAULT_REFRESH_INTERVAL_SECS};
use crate::error::CatalogError;
use crate::tasks::{Visibility, VisibilityHandle};

/// What caused a refresh check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Interval,
    BecameVisible,
}

/// Why a refresh check did not fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Hidden,
    Fresh,
}

/// Result of one refresh check.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Skipped(SkipReason),
    Refreshed { products: usize },
    Failed(CatalogError),
}

// == Refresh If Due ==
/// Refreshes the cache in the background if the host is visible and the
/// data is stale.
///
/// Concurrent checks collapse into one fetch through the cache's
/// request deduplication.
pub async fn refresh_if_due(
    cache: &CatalogCache,
    visibility: Visibility,
    trigger: RefreshTrigger,
) -> RefreshOutcome {
    if !visibility.is_visible() {
        debug!("Refresh check ({:?}) skipped: host hidden", trigger);
        return RefreshOutcome::Skipped(SkipReason::Hidden);
    }
    if !cache.is_stale().await {
        debug!("Refresh check ({:?}) skipped: catalog fresh", trigger);
        return RefreshOutcome::Skipped(SkipReason::Fresh);
    }

    match cache.refresh_in_background().await {
        Ok(collection) => {
            debug!(
                "Background refresh ({:?}) loaded {} products",
                trigger,
                collection.products.len()
            );
            RefreshOutcome::Refreshed {
                products: collection.products.len(),
            }
        }
        Err(err) => RefreshOutcome::Failed(err),
    }
}

// == Refresh Scheduler ==
/// Owns the background refresh loop.
///
/// # Example
/// ```ignore
/// let mut scheduler = RefreshScheduler::new(cache, visibility, Duration::from_secs(120));
/// scheduler.start();
/// // Later, during shutdown:
/// scheduler.stop();
/// ```
#[derive(Debug)]
pub struct RefreshScheduler {
    cache: CatalogCache,
    visibility: VisibilityHandle,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// A zero `period` falls back to the default refresh interval.
    pub fn new(cache: CatalogCache, visibility: VisibilityHandle, period: Duration) -> Self {
        let period = if period.is_zero() {
            warn!(
                "Refresh interval must be non-zero, using {} seconds",
                DEFAULT_REFRESH_INTERVAL_SECS
            );
            Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS)
        } else {
            period
        };
        Self {
            cache,
            visibility,
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Runs one check as the interval trigger would.
    pub async fn tick(&self) -> RefreshOutcome {
        refresh_if_due(
            &self.cache,
            self.visibility.current(),
            RefreshTrigger::Interval,
        )
        .await
    }

    // == Start ==
    /// Spawns the refresh loop. Calling it while running is a no-op.
    ///
    /// The first interval check happens one period after start.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("Refresh scheduler already running");
            return;
        }

        let cache = self.cache.clone();
        let visibility = self.visibility.clone();
        let period = self.period;

        self.handle = Some(tokio::spawn(async move {
            info!(
                "Starting background refresh task with interval of {} seconds",
                period.as_secs()
            );

            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let trigger = tokio::select! {
                    _ = ticker.tick() => RefreshTrigger::Interval,
                    _ = visibility.resumed() => RefreshTrigger::BecameVisible,
                };
                log_outcome(refresh_if_due(&cache, visibility.current(), trigger).await);
            }
        }));
    }

    // == Stop ==
    /// Aborts the refresh loop. In-flight fetches still complete.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Background refresh task stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn log_outcome(outcome: RefreshOutcome) {
    match outcome {
        RefreshOutcome::Refreshed { products } => {
            info!("Background refresh: loaded {} products", products)
        }
        RefreshOutcome::Failed(err) => warn!("Background refresh failed: {}", err),
        RefreshOutcome::Skipped(reason) => debug!("Background refresh skipped: {:?}", reason),
    }
}
