//! Error types for the catalog cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Catalog Error Enum ==
/// Classified failure of a catalog fetch or a consumer request.
///
/// `Clone` because one failed fetch is delivered to every caller
/// awaiting the shared request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Remote responded 404
    #[error("Catalog not found: {0}")]
    NotFound(String),

    /// Remote responded with an authorization-class status
    #[error("Access to catalog forbidden: {0}")]
    Forbidden(String),

    /// Request never reached the server
    #[error("Catalog source unreachable: {0}")]
    NetworkUnavailable(String),

    /// 5xx or unclassified failure
    #[error("Catalog source failure: {0}")]
    ServerFailure(String),

    /// Invalid consumer request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CatalogError {
    // == Classify Status ==
    /// Maps an HTTP status returned by the remote catalog to an error class.
    ///
    /// An empty body falls back to the canonical reason phrase.
    pub fn from_status(status: u16, body: Option<String>) -> Self {
        let message = body
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| {
                StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status))
            });

        match status {
            404 => CatalogError::NotFound(message),
            401 | 403 => CatalogError::Forbidden(message),
            _ => CatalogError::ServerFailure(message),
        }
    }

    /// Short machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::NotFound(_) => "not_found",
            CatalogError::Forbidden(_) => "forbidden",
            CatalogError::NetworkUnavailable(_) => "network_unavailable",
            CatalogError::ServerFailure(_) => "server_failure",
            CatalogError::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// Timeouts count as `NetworkUnavailable` even when the request reached
/// the server, since no usable response came back.
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return CatalogError::from_status(status.as_u16(), Some(err.to_string()));
        }
        if err.is_connect() || err.is_timeout() || err.is_request() {
            return CatalogError::NetworkUnavailable(err.to_string());
        }
        CatalogError::ServerFailure(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Forbidden(_) => StatusCode::FORBIDDEN,
            CatalogError::NetworkUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CatalogError::ServerFailure(_) => StatusCode::BAD_GATEWAY,
            CatalogError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog cache.
pub type Result<T> = std::result::Result<T, CatalogError>;
