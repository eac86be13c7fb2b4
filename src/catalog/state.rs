//! Cache State Module
//!
//! Holds the catalog snapshot and its freshness bookkeeping. Every
//! mutation goes through one of the synchronous transition methods
//! below; none of them performs I/O.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, ProductRecord, DEFAULT_EXPIRY_WINDOW_SECS};
use crate::error::CatalogError;

// == Fetch Status ==
/// Status of the foreground fetch.
///
/// Background refreshes never move this to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

// == Apply Outcome ==
/// Result of offering a fetched collection to the store.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// The catalog now held by the store
    pub catalog: Arc<Catalog>,
    /// `false` when the offered collection predated the stored one
    pub applied: bool,
}

// == Cache State ==
/// The process-wide catalog snapshot.
#[derive(Debug, Clone)]
pub struct CacheState {
    /// Current products and their derived category index
    catalog: Arc<Catalog>,
    /// When the current products were fetched, None if never
    last_fetched_at: Option<DateTime<Utc>>,
    /// Age after which data counts as stale
    expiry_window: Duration,
    /// Explicit staleness flag
    stale: bool,
    /// Foreground fetch status
    status: FetchStatus,
    /// Error of the most recent failed fetch
    last_error: Option<CatalogError>,
}

impl CacheState {
    // == Constructor ==
    /// Creates an empty, idle state with the given expiry window.
    pub fn new(expiry_window: Duration) -> Self {
        Self {
            catalog: Arc::new(Catalog::default()),
            last_fetched_at: None,
            expiry_window,
            stale: false,
            status: FetchStatus::Idle,
            last_error: None,
        }
    }

    // == Is Stale ==
    /// Whether the held data should be refreshed.
    ///
    /// True when never fetched, when older than the expiry window, or
    /// when explicitly flagged.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        if self.stale {
            return true;
        }
        match self.last_fetched_at {
            Some(fetched_at) => now - fetched_at > self.expiry_window,
            None => true,
        }
    }

    // == Apply Success ==
    /// Replaces the catalog with a freshly fetched collection.
    ///
    /// A collection fetched before the currently stored one is discarded
    /// and the stored catalog is returned instead.
    pub fn apply_success(
        &mut self,
        products: Vec<ProductRecord>,
        fetched_at: DateTime<Utc>,
    ) -> ApplyOutcome {
        if let Some(current) = self.last_fetched_at {
            if fetched_at < current {
                debug!(
                    "Discarding catalog fetched at {} (store holds {})",
                    fetched_at, current
                );
                return ApplyOutcome {
                    catalog: Arc::clone(&self.catalog),
                    applied: false,
                };
            }
        }

        self.catalog = Arc::new(Catalog::from_products(products));
        self.last_fetched_at = Some(fetched_at);
        self.status = FetchStatus::Succeeded;
        self.stale = false;
        self.last_error = None;

        ApplyOutcome {
            catalog: Arc::clone(&self.catalog),
            applied: true,
        }
    }

    // == Apply Failure ==
    /// Records a failed fetch.
    ///
    /// Existing products are kept; status only becomes `Failed` when
    /// there is nothing to show.
    pub fn apply_failure(&mut self, error: CatalogError) {
        if self.catalog.is_empty() {
            self.status = FetchStatus::Failed;
        }
        self.last_error = Some(error);
        self.stale = true;
    }

    // == Apply Pending If Empty ==
    /// Enters `Pending` for a first load. No-op once products exist.
    pub fn apply_pending_if_empty(&mut self) {
        if self.catalog.is_empty() {
            self.status = FetchStatus::Pending;
        }
    }

    // == Invalidate ==
    /// Drops all products and forces the next read to fetch.
    pub fn invalidate(&mut self) {
        self.catalog = Arc::new(Catalog::default());
        self.last_fetched_at = None;
        self.stale = true;
    }

    // == Mark Stale ==
    /// Flags the data as stale without clearing it.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Changes the expiry window used by `is_stale`.
    pub fn set_expiry_window(&mut self, window: Duration) {
        self.expiry_window = window;
    }

    // == Accessors ==
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.last_fetched_at
    }

    pub fn expiry_window(&self) -> Duration {
        self.expiry_window
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&CatalogError> {
        self.last_error.as_ref()
    }

    /// The explicit staleness flag alone, ignoring the expiry window.
    pub fn stale_flag(&self) -> bool {
        self.stale
    }
}

impl Default for CacheState {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_EXPIRY_WINDOW_SECS))
    }
}
