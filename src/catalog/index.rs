//! Category Index Module
//!
//! Derives the category -> products mapping from a product collection.

use std::collections::BTreeMap;

use crate::catalog::ProductRecord;

/// Mapping from category name to the products in that category.
///
/// Each bucket preserves the relative order of the source collection.
pub type CategoryIndex = BTreeMap<String, Vec<ProductRecord>>;

// == Build Index ==
/// Builds the category index from a product collection.
///
/// Always a full rebuild; the index is never patched incrementally.
pub fn build_index(products: &[ProductRecord]) -> CategoryIndex {
    let mut index = CategoryIndex::new();
    for product in products {
        index
            .entry(product.category.clone())
            .or_default()
            .push(product.clone());
    }
    index
}

// == Catalog ==
/// Immutable snapshot of a product collection together with its index.
///
/// The only constructor derives the index from the products, so the two
/// can never diverge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<ProductRecord>,
    index: CategoryIndex,
}

impl Catalog {
    /// Creates a catalog, deriving its category index.
    pub fn from_products(products: Vec<ProductRecord>) -> Self {
        let index = build_index(&products);
        Self { products, index }
    }

    /// All products in server response order.
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    /// The derived category index.
    pub fn index(&self) -> &CategoryIndex {
        &self.index
    }

    /// Products in `category`, empty when the category is unknown.
    pub fn in_category(&self, category: &str) -> &[ProductRecord] {
        self.index.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
