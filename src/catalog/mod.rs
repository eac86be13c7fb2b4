//! Catalog Module
//!
//! Client-resident product catalog cache: freshness decisions, request
//! deduplication, the derived category index and read-only views.

mod clock;
mod dedup;
mod index;
mod orchestrator;
mod product;
mod selectors;
mod source;
mod state;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use dedup::RequestDeduplicator;
pub use index::{build_index, Catalog, CategoryIndex};
pub use orchestrator::{CatalogCache, ListOptions, ProductCollection};
pub use product::ProductRecord;
pub use selectors::{
    all_products, catalog_status, category_summaries, products_by_category, CatalogStatus,
    CategorySummary,
};
pub use source::{CatalogSource, HttpCatalogSource};
pub use state::{ApplyOutcome, CacheState, FetchStatus};

// == Public Constants ==
/// Age in seconds after which cached data is stale
pub const DEFAULT_EXPIRY_WINDOW_SECS: i64 = 5 * 60;

/// Age in seconds after which an in-flight request no longer absorbs callers
pub const DEFAULT_DEDUP_TIMEOUT_SECS: i64 = 30;

/// Period in seconds of the background refresh check
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 2 * 60;
