//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

use crate::catalog::ListOptions;
use crate::tasks::Visibility;

/// Query string of `GET /products`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProductsQuery {
    /// Restrict to one category
    #[serde(default)]
    pub category: Option<String>,
    /// Bypass fresh cached data
    #[serde(default)]
    pub force_refresh: bool,
}

impl From<ListProductsQuery> for ListOptions {
    fn from(query: ListProductsQuery) -> Self {
        ListOptions {
            force_refresh: query.force_refresh,
            category: query.category.filter(|c| !c.is_empty()),
        }
    }
}

/// Request body of `PUT /cache/expiry`
#[derive(Debug, Clone, Deserialize)]
pub struct ExpiryRequest {
    /// New expiry window in seconds
    pub seconds: u64,
}

impl ExpiryRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.seconds == 0 {
            return Some("Expiry window must be at least one second".to_string());
        }
        if self.seconds > i64::MAX as u64 / 1000 {
            return Some("Expiry window is too large".to_string());
        }
        None
    }
}

/// Request body of `PUT /visibility`
#[derive(Debug, Clone, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

impl VisibilityRequest {
    pub fn visibility(&self) -> Visibility {
        Visibility::from_visible(self.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_category_means_all() {
        let query = ListProductsQuery {
            category: Some(String::new()),
            force_refresh: true,
        };
        let options = ListOptions::from(query);
        assert!(options.category.is_none());
        assert!(options.force_refresh);
    }

    #[test]
    fn test_expiry_request_deserialize() {
        let req: ExpiryRequest = serde_json::from_str(r#"{"seconds": 60}"#).unwrap();
        assert_eq!(req.seconds, 60);
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_zero_expiry() {
        let req = ExpiryRequest { seconds: 0 };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_visibility_request() {
        let req: VisibilityRequest = serde_json::from_str(r#"{"visible": false}"#).unwrap();
        assert_eq!(req.visibility(), Visibility::Hidden);
    }
}
