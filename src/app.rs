//! Router assembly.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::auth;
use crate::handlers;
use crate::state::AppState;

/// Build the full application router over shared state.
///
/// Every route, health and metrics included, sits behind the API key
/// middleware.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/convert/markdown", post(handlers::convert_markdown_handler))
        .route("/convert/html", post(handlers::convert_html_handler))
        .route("/convert/text", post(handlers::convert_text_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .with_state(state)
}
