//! Selectors Module
//!
//! Read-only views over the cache state for presentation code. None of
//! these trigger a fetch.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{CacheState, CatalogCache, FetchStatus, ProductRecord};

// == Catalog Status ==
/// Aggregate view of the cache for a consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStatus {
    pub products: Vec<ProductRecord>,
    pub status: FetchStatus,
    /// `true` only during a first load
    pub loading: bool,
    pub error: Option<String>,
    pub is_stale: bool,
    pub last_fetched: Option<DateTime<Utc>>,
}

/// Category name with the number of products in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub product_count: usize,
}

pub fn all_products(state: &CacheState) -> Vec<ProductRecord> {
    state.catalog().products().to_vec()
}

pub fn products_by_category(state: &CacheState, category: &str) -> Vec<ProductRecord> {
    state.catalog().in_category(category).to_vec()
}

pub fn category_summaries(state: &CacheState) -> Vec<CategorySummary> {
    state
        .catalog()
        .index()
        .iter()
        .map(|(name, products)| CategorySummary {
            name: name.clone(),
            product_count: products.len(),
        })
        .collect()
}

pub fn catalog_status(state: &CacheState, now: DateTime<Utc>) -> CatalogStatus {
    CatalogStatus {
        products: all_products(state),
        status: state.status(),
        loading: state.status() == FetchStatus::Pending,
        error: state.last_error().map(ToString::to_string),
        is_stale: state.is_stale(now),
        last_fetched: state.last_fetched_at(),
    }
}

impl CatalogCache {
    /// All cached products.
    pub async fn products(&self) -> Vec<ProductRecord> {
        all_products(&self.snapshot().await)
    }

    /// Cached products in `category`.
    pub async fn products_in_category(&self, category: &str) -> Vec<ProductRecord> {
        products_by_category(&self.snapshot().await, category)
    }

    pub async fn categories(&self) -> Vec<CategorySummary> {
        category_summaries(&self.snapshot().await)
    }

    pub async fn status(&self) -> CatalogStatus {
        let state = self.snapshot().await;
        catalog_status(&state, self.clock().now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::sample_products;
    use crate::error::CatalogError;

    #[test]
    fn test_status_of_empty_cache() {
        let status = catalog_status(&CacheState::default(), Utc::now());

        assert!(status.products.is_empty());
        assert!(!status.loading);
        assert!(status.error.is_none());
        assert!(status.is_stale);
        assert!(status.last_fetched.is_none());
    }

    #[test]
    fn test_status_loading_during_first_load() {
        let mut state = CacheState::default();
        state.apply_pending_if_empty();

        assert!(catalog_status(&state, Utc::now()).loading);
    }

    #[test]
    fn test_status_reports_error_with_data() {
        let now = Utc::now();
        let mut state = CacheState::default();
        state.apply_success(sample_products(), now);
        state.apply_failure(CatalogError::Forbidden("token expired".into()));

        let status = catalog_status(&state, now);

        assert_eq!(status.products.len(), 3);
        assert!(status.is_stale);
        assert!(status.error.unwrap().contains("token expired"));
    }

    #[test]
    fn test_products_by_category() {
        let mut state = CacheState::default();
        state.apply_success(sample_products(), Utc::now());

        assert_eq!(products_by_category(&state, "Electronics").len(), 2);
        assert!(products_by_category(&state, "Garden").is_empty());
    }

    #[test]
    fn test_category_summaries() {
        let mut state = CacheState::default();
        state.apply_success(sample_products(), Utc::now());

        let summaries = category_summaries(&state);

        assert_eq!(
            summaries,
            vec![
                CategorySummary {
                    name: "Apparel".into(),
                    product_count: 1
                },
                CategorySummary {
                    name: "Electronics".into(),
                    product_count: 2
                },
            ]
        );
    }
}
