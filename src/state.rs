use std::sync::Arc;

use tokio::sync::mpsc;

use crate::cache::ResultCache;
use crate::load_balancer::LoadBalancer;
use crate::models::QueuedJob;
use crate::rate_limit::RateLimiter;

/// Shared application state.
pub struct AppState {
    pub api_key: String,
    pub cache: Arc<ResultCache>,
    pub load_balancer: Arc<LoadBalancer>,
    pub rate_limiter: RateLimiter,
    pub job_tx: mpsc::Sender<QueuedJob>,
}
