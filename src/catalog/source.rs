//! Catalog Source Module
//!
//! The remote "list all products" endpoint the cache refreshes from.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::catalog::ProductRecord;
use crate::error::{CatalogError, Result};

// == Catalog Source ==
/// Remote provider of the full product list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns every product in server order.
    async fn fetch_product_list(&self) -> Result<Vec<ProductRecord>>;
}

// == HTTP Catalog Source ==
/// Fetches the product list from a REST endpoint returning a JSON array.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    /// Creates a source for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_product_list(&self) -> Result<Vec<ProductRecord>> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(CatalogError::from_status(status.as_u16(), body));
        }

        response
            .json::<Vec<ProductRecord>>()
            .await
            .map_err(|e| CatalogError::ServerFailure(format!("Malformed product list: {}", e)))
    }
}
