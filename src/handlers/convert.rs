use std::sync::Arc;
use std::time::Instant;

use axum::{Extension, Json, extract::State};
use tokio::sync::oneshot;

use crate::auth::ClientIdentity;
use crate::error::ApiError;
use crate::metrics::{CONVERT_LATENCY, RATE_LIMITED_TOTAL, REQUEST_TOTAL};
use crate::models::{
    ConversionJob, ConvertResponse, ConvertToHtmlRequest, ConvertToMarkdownRequest,
    ConvertToTextRequest, QueuedJob,
};
use crate::state::AppState;

pub async fn convert_markdown_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<ClientIdentity>,
    Json(payload): Json<ConvertToMarkdownRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    payload.enrichment.validate()?;
    dispatch(&state, &identity, payload.into_job()).await.map(Json)
}

pub async fn convert_html_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<ClientIdentity>,
    Json(payload): Json<ConvertToHtmlRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    payload.enrichment.validate()?;
    dispatch(&state, &identity, payload.into_job()).await.map(Json)
}

pub async fn convert_text_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<ClientIdentity>,
    Json(payload): Json<ConvertToTextRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    payload.enrichment.validate()?;
    dispatch(&state, &identity, payload.into_job()).await.map(Json)
}

/// Common path for every conversion: admission check first, then hand the
/// job to the worker and wait for its reply. A rejected request performs no
/// conversion work at all.
async fn dispatch(
    state: &AppState,
    identity: &ClientIdentity,
    job: ConversionJob,
) -> Result<ConvertResponse, ApiError> {
    REQUEST_TOTAL.inc();

    if !state.rate_limiter.is_allowed(&identity.client_id) {
        RATE_LIMITED_TOTAL.inc();
        return Err(ApiError::RateLimitExceeded);
    }

    let start_time = Instant::now();

    let (response_tx, response_rx) = oneshot::channel();

    state
        .job_tx
        .send(QueuedJob { job, response_tx })
        .await
        .map_err(|_| ApiError::Internal)?;

    let result = response_rx.await.map_err(|_| ApiError::Internal)?;

    CONVERT_LATENCY.observe(start_time.elapsed().as_secs_f64());

    result
}
