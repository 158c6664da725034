//! API key authentication.
//!
//! Every route sits behind this middleware, the health and metrics
//! endpoints included. The identity handed to the rate limiter is derived
//! from the presented credential rather than carrying the raw key around.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authenticated caller, attached to the request for downstream handlers.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub client_id: String,
}

/// Derive a stable client id from a credential.
pub fn client_id_for(credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credential);
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    match presented {
        Some(key) if key == state.api_key => {
            req.extensions_mut().insert(ClientIdentity {
                client_id: client_id_for(&key),
            });
            Ok(next.run(req).await)
        }
        _ => Err(ApiError::InvalidApiKey),
    }
}
