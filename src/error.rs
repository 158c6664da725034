//! API error taxonomy and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to API clients.
///
/// Backend failures are deliberately opaque at this boundary: the worker
/// logs the detail and hands back [`ApiError::Internal`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API Key")]
    InvalidApiKey,

    /// Quota rejection is an expected outcome, not a fault. The limiter
    /// only returns a boolean; this variant is how the HTTP layer spells it.
    #[error("Rate limit exceeded. Try again later.")]
    RateLimitExceeded,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("no healthy conversion backend available")]
    NoBackend,

    #[error("internal conversion error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ApiError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NoBackend => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
