//! Product Record Module
//!
//! Defines the product record as delivered by the remote catalog.

use serde::{Deserialize, Serialize};

// == Product Record ==
/// A single product in the catalog.
///
/// The cache never mutates a record; a refresh replaces the whole
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Product identity
    pub id: String,
    /// Display name
    pub name: String,
    /// Image URL or path
    pub image: String,
    /// Unit price
    pub price: f64,
    /// Category name, used for the category index
    pub category: String,
    /// Units in stock
    pub stock_count: u32,
    /// Average review rating
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews
    #[serde(default)]
    pub review_count: u32,
}

impl ProductRecord {
    /// Creates a record with no reviews yet.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            price,
            category: category.into(),
            stock_count: 0,
            rating: 0.0,
            review_count: 0,
        }
    }
}
