//! API Module
//!
//! HTTP handlers and routing through which presentation code reads the
//! product catalog and controls the cache.
//!
//! # Endpoints
//! - `GET /products` - Read the catalog
//! - `GET /categories` - Category summaries
//! - `GET /status` - Aggregate cache status
//! - `POST /cache/invalidate`, `POST /cache/mark-stale`, `PUT /cache/expiry`
//! - `PUT /visibility` - Host visibility report
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
