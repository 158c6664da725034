//! Round-robin pool of conversion backends with health tracking.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::time::{Duration, interval};
use tracing::{info, warn};

/// Single conversion backend server.
pub struct Backend {
    pub url: String,
    healthy: AtomicBool,
}

impl Backend {
    pub fn new(url: String) -> Self {
        Self {
            url,
            healthy: AtomicBool::new(true),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Relaxed);
    }
}

/// Load balancer over multiple backends.
pub struct LoadBalancer {
    backends: Vec<Arc<Backend>>,
    current: AtomicUsize,
}

impl LoadBalancer {
    /// Create from comma-separated urls: "localhost:5001,localhost:5002".
    /// Entries without a scheme get "http://" prepended.
    pub fn new(backends_str: &str) -> Self {
        let backends: Vec<Arc<Backend>> = backends_str
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|url| {
                let full_url = if url.starts_with("http") {
                    url.to_string()
                } else {
                    format!("http://{}", url)
                };
                Arc::new(Backend::new(full_url))
            })
            .collect();
        if backends.is_empty() {
            panic!("At least one conversion backend required");
        }

        info!(count = backends.len(), "load balancer initialized");
        for (i, b) in backends.iter().enumerate() {
            info!(index = i + 1, backend = %b.url, "registered backend");
        }

        Self {
            backends,
            current: AtomicUsize::new(0),
        }
    }

    /// Next healthy backend, round-robin. `None` when all are down.
    pub fn get_backend(&self) -> Option<Arc<Backend>> {
        let len = self.backends.len();
        let start = self.current.fetch_add(1, Ordering::Relaxed) % len;

        for i in 0..len {
            let idx = (start + i) % len;
            let backend = &self.backends[idx];

            if backend.is_healthy() {
                return Some(Arc::clone(backend));
            }
        }
        None
    }

    /// All backends, for the health checker.
    pub fn all_backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }
}

/// Probe every backend's health endpoint on a fixed interval.
pub async fn health_checker(
    load_balancer: Arc<LoadBalancer>,
    client: reqwest::Client,
    check_interval: Duration,
) {
    let mut interval = interval(check_interval);

    info!(interval_secs = check_interval.as_secs(), "health checker started");

    loop {
        interval.tick().await;

        for backend in load_balancer.all_backends() {
            let url = format!("{}/health", backend.url);

            let was_healthy = backend.is_healthy();

            let is_healthy = match client
                .get(&url)
                .timeout(Duration::from_secs(5))
                .send()
                .await
            {
                Ok(res) => res.status().is_success(),
                Err(_) => false,
            };
            backend.set_healthy(is_healthy);

            if was_healthy != is_healthy {
                if is_healthy {
                    info!(backend = %backend.url, "backend is healthy again");
                } else {
                    warn!(backend = %backend.url, "backend marked unhealthy");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_gain_scheme_and_lose_whitespace() {
        let lb = LoadBalancer::new(" localhost:5001 , https://convert.internal ");
        let urls: Vec<_> = lb.all_backends().iter().map(|b| b.url.clone()).collect();
        assert_eq!(urls, vec!["http://localhost:5001", "https://convert.internal"]);
    }

    #[test]
    #[should_panic]
    fn empty_backend_list_panics() {
        LoadBalancer::new(" , ");
    }

    #[test]
    fn round_robin_cycles_backends() {
        let lb = LoadBalancer::new("a:1,b:2");
        assert_eq!(lb.get_backend().unwrap().url, "http://a:1");
        assert_eq!(lb.get_backend().unwrap().url, "http://b:2");
        assert_eq!(lb.get_backend().unwrap().url, "http://a:1");
    }

    #[test]
    fn unhealthy_backends_are_skipped() {
        let lb = LoadBalancer::new("a:1,b:2");
        lb.all_backends()[0].set_healthy(false);
        assert_eq!(lb.get_backend().unwrap().url, "http://b:2");
        assert_eq!(lb.get_backend().unwrap().url, "http://b:2");
    }

    #[test]
    fn no_healthy_backend_returns_none() {
        let lb = LoadBalancer::new("a:1");
        lb.all_backends()[0].set_healthy(false);
        assert!(lb.get_backend().is_none());
    }
}
