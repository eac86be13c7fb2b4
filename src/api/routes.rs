//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    categories_handler, expiry_handler, health_handler, invalidate_handler,
    list_products_handler, mark_stale_handler, status_handler, visibility_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /products` - Read the catalog (`category`, `force_refresh` query)
/// - `GET /categories` - Category names with product counts
/// - `GET /status` - Aggregate cache status
/// - `POST /cache/invalidate` - Drop cached products
/// - `POST /cache/mark-stale` - Flag cached products stale
/// - `PUT /cache/expiry` - Change the expiry window
/// - `PUT /visibility` - Report host visibility
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/products", get(list_products_handler))
        .route("/categories", get(categories_handler))
        .route("/status", get(status_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/cache/mark-stale", post(mark_stale_handler))
        .route("/cache/expiry", put(expiry_handler))
        .route("/visibility", put(visibility_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
