//! API Handlers
//!
//! HTTP request handlers through which presentation code reads the
//! catalog and controls the cache.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Duration;
use tracing::info;

use crate::catalog::{CatalogCache, ListOptions};
use crate::error::{CatalogError, Result};
use crate::models::{
    CategoriesResponse, ExpiryRequest, HealthResponse, ListProductsQuery, MessageResponse,
    ProductsResponse, StatusResponse, VisibilityRequest,
};
use crate::tasks::VisibilityHandle;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Shared catalog cache
    pub cache: CatalogCache,
    /// Host visibility reported by the consumer
    pub visibility: VisibilityHandle,
}

impl AppState {
    pub fn new(cache: CatalogCache, visibility: VisibilityHandle) -> Self {
        Self { cache, visibility }
    }
}

/// Handler for GET /products
///
/// Serves cached products or fetches them when empty, stale or forced.
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ProductsResponse>> {
    let collection = state.cache.list_products(ListOptions::from(query)).await?;
    Ok(Json(collection.into()))
}

/// Handler for GET /categories
pub async fn categories_handler(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.cache.categories().await,
    })
}

/// Handler for GET /status
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.cache.status().await)
}

/// Handler for POST /cache/invalidate
pub async fn invalidate_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.invalidate().await;
    Json(MessageResponse::new("Catalog cache invalidated"))
}

/// Handler for POST /cache/mark-stale
pub async fn mark_stale_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.mark_stale().await;
    Json(MessageResponse::new("Catalog cache marked stale"))
}

/// Handler for PUT /cache/expiry
pub async fn expiry_handler(
    State(state): State<AppState>,
    Json(req): Json<ExpiryRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CatalogError::InvalidRequest(error_msg));
    }

    state
        .cache
        .update_expiry_window(Duration::seconds(req.seconds as i64))
        .await;

    Ok(Json(MessageResponse::new(format!(
        "Expiry window set to {} seconds",
        req.seconds
    ))))
}

/// Handler for PUT /visibility
///
/// The refresh scheduler reacts to the hidden -> visible transition.
pub async fn visibility_handler(
    State(state): State<AppState>,
    Json(req): Json<VisibilityRequest>,
) -> Json<MessageResponse> {
    let current = req.visibility();
    let previous = state.visibility.set(current);
    if previous != current {
        info!("Host visibility changed: {:?} -> {:?}", previous, current);
    }
    Json(MessageResponse::new(format!("Visibility is {:?}", current)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
