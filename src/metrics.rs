use lazy_static::lazy_static;
use prometheus::{
    Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter = register_counter!(
        "docling_requests_total",
        "Total number of conversion requests"
    )
    .unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "docling_rate_limited_total",
        "Requests rejected by the rate limiter"
    )
    .unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("docling_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("docling_cache_misses_total", "Total cache misses").unwrap();
    pub static ref CONVERT_LATENCY: Histogram = register_histogram!(
        "docling_convert_latency_seconds",
        "End to end conversion latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge = register_gauge!(
        "docling_rate_limiter_clients",
        "Clients currently tracked by the rate limiter"
    )
    .unwrap();
}
