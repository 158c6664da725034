//! Background conversion worker.
//!
//! Jobs come off the queue one at a time, so the gateway keeps at most one
//! in-flight conversion per process no matter how many handlers are
//! waiting. Conversion itself happens in the backend; this loop is cache
//! lookup, backend selection, and the HTTP round trip.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::cache::{ResultCache, make_cache_key};
use crate::error::ApiError;
use crate::load_balancer::LoadBalancer;
use crate::metrics::{CACHE_HITS, CACHE_MISSES};
use crate::models::{ConvertResponse, QueuedJob};

pub async fn convert_worker(
    mut rx: mpsc::Receiver<QueuedJob>,
    client: reqwest::Client,
    load_balancer: Arc<LoadBalancer>,
    cache: Arc<ResultCache>,
) {
    info!("conversion worker started");

    while let Some(queued) = rx.recv().await {
        let cache_key = make_cache_key(&queued.job);

        if let Some(cached) = cache.get(&cache_key) {
            CACHE_HITS.inc();
            let _ = queued.response_tx.send(Ok(cached));
            continue;
        }
        CACHE_MISSES.inc();

        let backend = match load_balancer.get_backend() {
            Some(b) => b,
            None => {
                let _ = queued.response_tx.send(Err(ApiError::NoBackend));
                continue;
            }
        };
        debug!(backend = %backend.url, source = %queued.job.source, "dispatching conversion");

        let result = client
            .post(format!("{}/v1/convert", backend.url))
            .json(&queued.job)
            .send()
            .await;

        // Whatever went wrong stays in the logs; clients get a generic
        // internal error.
        let response = match result {
            Ok(res) if res.status().is_success() => {
                match res.json::<ConvertResponse>().await {
                    Ok(body) => {
                        cache.put(&cache_key, &body);
                        Ok(body)
                    }
                    Err(e) => {
                        error!(backend = %backend.url, error = %e, "unreadable backend response");
                        Err(ApiError::Internal)
                    }
                }
            }
            Ok(res) => {
                error!(backend = %backend.url, status = %res.status(), "backend rejected conversion");
                Err(ApiError::Internal)
            }
            Err(e) => {
                backend.set_healthy(false);
                error!(backend = %backend.url, error = %e, "backend request failed, marked unhealthy");
                Err(ApiError::Internal)
            }
        };

        // Receiver may have given up waiting; nothing to do then.
        let _ = queued.response_tx.send(response);
    }
}
