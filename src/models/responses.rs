//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{CatalogStatus, CategorySummary, ProductCollection, ProductRecord};

/// Response body of `GET /products`
#[derive(Debug, Clone, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<ProductRecord>,
    pub count: usize,
    pub from_cache: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<ProductCollection> for ProductsResponse {
    fn from(collection: ProductCollection) -> Self {
        Self {
            count: collection.products.len(),
            products: collection.products,
            from_cache: collection.from_cache,
            timestamp: collection.timestamp,
        }
    }
}

/// Response body of `GET /status`
pub type StatusResponse = CatalogStatus;

/// Response body of `GET /categories`
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategorySummary>,
}

/// Acknowledgement for cache control requests
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_response_counts() {
        let resp = ProductsResponse::from(ProductCollection {
            products: vec![ProductRecord::new("1", "Phone", "Electronics", 1.0)],
            from_cache: true,
            timestamp: None,
        });
        assert_eq!(resp.count, 1);
        assert!(resp.from_cache);
    }

    #[test]
    fn test_products_response_serialize() {
        let resp = ProductsResponse::from(ProductCollection {
            products: vec![],
            from_cache: false,
            timestamp: Some(Utc::now()),
        });
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("from_cache"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
