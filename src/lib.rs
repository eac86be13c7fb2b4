//! Catalog Cache - A client-resident product catalog cache
//!
//! Serves product data from memory while it is fresh, collapses
//! concurrent fetches into one, keeps a category index in step with the
//! products and refreshes stale data in the background.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use catalog::{CatalogCache, ListOptions, ProductCollection};
pub use config::Config;
pub use error::CatalogError;
pub use tasks::{RefreshScheduler, VisibilityHandle};
