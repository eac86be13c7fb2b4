//! Fetch Orchestrator Module
//!
//! Decides, per read, whether to serve the cached catalog or to start
//! (or join) a fetch from the remote source.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::catalog::{
    CacheState, Catalog, CatalogSource, Clock, FetchStatus, ProductRecord, RequestDeduplicator,
    DEFAULT_DEDUP_TIMEOUT_SECS, DEFAULT_EXPIRY_WINDOW_SECS,
};
use crate::error::{CatalogError, Result};

// == List Options ==
/// Options for a catalog read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Fetch even if the cached data is fresh
    pub force_refresh: bool,
    /// Restrict the result to one category
    pub category: Option<String>,
}

impl ListOptions {
    pub fn forced() -> Self {
        Self {
            force_refresh: true,
            category: None,
        }
    }

    pub fn in_category(category: impl Into<String>) -> Self {
        Self {
            force_refresh: false,
            category: Some(category.into()),
        }
    }

    /// Deduplication key; logically different requests never share one.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}:{}",
            self.category.as_deref().unwrap_or("all"),
            self.force_refresh
        )
    }
}

// == Product Collection ==
/// Result of a catalog read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCollection {
    pub products: Vec<ProductRecord>,
    /// `true` when served without a network call
    pub from_cache: bool,
    /// Fetch time of the data returned
    pub timestamp: Option<DateTime<Utc>>,
}

// == Fetch Origin ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchOrigin {
    Foreground,
    Background,
}

/// What the shared fetch resolves to.
#[derive(Debug, Clone)]
struct Fetched {
    catalog: Arc<Catalog>,
    timestamp: Option<DateTime<Utc>>,
}

// == Catalog Cache ==
/// Handle to one catalog cache instance.
///
/// Cloning is cheap; every clone sees the same state.
#[derive(Clone)]
pub struct CatalogCache {
    state: Arc<RwLock<CacheState>>,
    dedup: Arc<RequestDeduplicator<Fetched>>,
    source: Arc<dyn CatalogSource>,
    clock: Arc<dyn Clock>,
}

impl CatalogCache {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new(
        source: Arc<dyn CatalogSource>,
        clock: Arc<dyn Clock>,
        expiry_window: Duration,
        dedup_timeout: Duration,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::new(expiry_window))),
            dedup: Arc::new(RequestDeduplicator::new(dedup_timeout, Arc::clone(&clock))),
            source,
            clock,
        }
    }

    /// Creates a cache from the loaded configuration.
    pub fn from_config(
        config: &crate::config::Config,
        source: Arc<dyn CatalogSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let seconds = |secs: u64, default: i64| {
            i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or_else(|| Duration::seconds(default))
        };
        Self::new(
            source,
            clock,
            seconds(config.expiry_window_secs, DEFAULT_EXPIRY_WINDOW_SECS),
            seconds(config.dedup_timeout_secs, DEFAULT_DEDUP_TIMEOUT_SECS),
        )
    }

    // == List Products ==
    /// Reads the catalog, fetching when the cache is empty, stale or a
    /// refresh is forced.
    ///
    /// A first load shows `Pending`; once products exist, refreshes keep
    /// serving them until the new data lands.
    pub async fn list_products(&self, options: ListOptions) -> Result<ProductCollection> {
        self.read_or_fetch(options, FetchOrigin::Foreground).await
    }

    // == Refresh In Background ==
    /// Forces a silent refresh.
    ///
    /// Never enters `Pending`; a failure only marks the data stale.
    pub async fn refresh_in_background(&self) -> Result<ProductCollection> {
        self.read_or_fetch(ListOptions::forced(), FetchOrigin::Background)
            .await
    }

    async fn read_or_fetch(
        &self,
        options: ListOptions,
        origin: FetchOrigin,
    ) -> Result<ProductCollection> {
        {
            let mut state = self.state.write().await;
            let now = self.clock.now();
            let stale = state.is_stale(now);
            let catalog = state.catalog();

            if origin == FetchOrigin::Foreground {
                state.apply_pending_if_empty();
            }

            if !stale && !options.force_refresh && !catalog.is_empty() {
                debug!("Serving catalog from cache ({} products)", catalog.len());
                return Ok(ProductCollection {
                    products: select(&catalog, options.category.as_deref()),
                    from_cache: true,
                    timestamp: state.last_fetched_at(),
                });
            }
        }

        let key = options.dedup_key();
        let state = Arc::clone(&self.state);
        let source = Arc::clone(&self.source);
        let clock = Arc::clone(&self.clock);

        let fetched = match self
            .dedup
            .execute(&key, move || fetch_and_apply(state, source, clock, origin))
            .await
        {
            Ok(fetched) => fetched,
            Err(err) => {
                if origin == FetchOrigin::Foreground {
                    self.settle_pending_load(&err).await;
                }
                return Err(err);
            }
        };

        Ok(ProductCollection {
            products: select(&fetched.catalog, options.category.as_deref()),
            from_cache: false,
            timestamp: fetched.timestamp,
        })
    }

    /// Fails a first load that joined a fetch started in the background.
    ///
    /// A fetch started in the foreground has already recorded its failure,
    /// so the status is no longer `Pending` by the time its callers get here.
    async fn settle_pending_load(&self, err: &CatalogError) {
        let mut state = self.state.write().await;
        if state.status() == FetchStatus::Pending {
            warn!("First catalog load failed: {}", err);
            state.apply_failure(err.clone());
        }
    }

    // == Controls ==
    /// Clears all products; the next read fetches.
    pub async fn invalidate(&self) {
        self.state.write().await.invalidate();
        info!("Catalog cache invalidated");
    }

    /// Flags the data stale without clearing it.
    pub async fn mark_stale(&self) {
        self.state.write().await.mark_stale();
        debug!("Catalog cache marked stale");
    }

    /// Changes the age after which data is considered stale.
    pub async fn update_expiry_window(&self, window: Duration) {
        self.state.write().await.set_expiry_window(window);
        info!("Catalog expiry window set to {}s", window.num_seconds());
    }

    // == Snapshot ==
    /// A copy of the current state for read-only views.
    pub async fn snapshot(&self) -> CacheState {
        self.state.read().await.clone()
    }

    /// Staleness of the current data at the clock's current time.
    pub async fn is_stale(&self) -> bool {
        self.state.read().await.is_stale(self.clock.now())
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Number of fetches currently registered for deduplication.
    pub fn in_flight(&self) -> usize {
        self.dedup.in_flight()
    }
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("dedup", &self.dedup)
            .field("clock", &self.clock)
            .finish()
    }
}

/// Products of `catalog`, restricted to `category` when given.
fn select(catalog: &Catalog, category: Option<&str>) -> Vec<ProductRecord> {
    match category {
        Some(category) => catalog.in_category(category).to_vec(),
        None => catalog.products().to_vec(),
    }
}

/// The deduplicated unit of work: one network call, one state write.
async fn fetch_and_apply(
    state: Arc<RwLock<CacheState>>,
    source: Arc<dyn CatalogSource>,
    clock: Arc<dyn Clock>,
    origin: FetchOrigin,
) -> Result<Fetched> {
    let requested_at = clock.now();

    match source.fetch_product_list().await {
        Ok(products) => {
            let count = products.len();
            let mut state = state.write().await;
            let outcome = state.apply_success(products, requested_at);
            if outcome.applied {
                info!("Catalog refreshed with {} products ({:?})", count, origin);
            }
            Ok(Fetched {
                catalog: outcome.catalog,
                timestamp: state.last_fetched_at(),
            })
        }
        Err(err) => {
            let mut state = state.write().await;
            match origin {
                FetchOrigin::Foreground => {
                    warn!("Catalog fetch failed: {}", err);
                    state.apply_failure(err.clone());
                }
                FetchOrigin::Background => {
                    warn!("Background catalog refresh failed: {}", err);
                    state.mark_stale();
                }
            }
            Err(err)
        }
    }
}
