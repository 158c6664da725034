//! HTTP-level tests driving the router in-process.
//!
//! The worker is wired to an unreachable backend, so every dispatched
//! conversion fails fast; what these tests exercise is the gateway itself:
//! authentication, validation, admission, and error mapping.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::util::ServiceExt;

use docling_gateway::app::build_app;
use docling_gateway::cache::ResultCache;
use docling_gateway::load_balancer::LoadBalancer;
use docling_gateway::models::QueuedJob;
use docling_gateway::rate_limit::RateLimiter;
use docling_gateway::state::AppState;
use docling_gateway::worker::convert_worker;

const TEST_API_KEY: &str = "test-api-key";

fn test_app(max_requests: usize) -> Router {
    let (job_tx, job_rx) = mpsc::channel::<QueuedJob>(100);
    let load_balancer = Arc::new(LoadBalancer::new("127.0.0.1:1"));
    let cache = Arc::new(ResultCache::new());

    let state = Arc::new(AppState {
        api_key: TEST_API_KEY.to_string(),
        cache: cache.clone(),
        load_balancer: load_balancer.clone(),
        rate_limiter: RateLimiter::new(max_requests, Duration::from_secs(3600)),
        job_tx,
    });

    tokio::spawn(convert_worker(
        job_rx,
        reqwest::Client::new(),
        load_balancer,
        cache,
    ));

    build_app(state)
}

fn get(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::empty()).unwrap()
}

fn convert(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("X-API-Key", TEST_API_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(res: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn requests_without_api_key_are_rejected() {
    let app = test_app(100);
    let res = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["detail"], "Invalid API Key");
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    let app = test_app(100);
    let res = app.oneshot(get("/", Some("not-the-key"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn root_welcomes_authenticated_clients() {
    let app = test_app(100);
    let res = app.oneshot(get("/", Some(TEST_API_KEY))).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res).await["message"],
        "Welcome to the Docling Gateway!"
    );
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = test_app(100);
    let res = app.oneshot(get("/health", Some(TEST_API_KEY))).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn missing_source_is_unprocessable() {
    let app = test_app(100);
    let res = app
        .oneshot(convert("/convert/markdown", json!({ "markdown_params": {} })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn picture_scale_out_of_range_is_unprocessable() {
    let app = test_app(100);
    let res = app
        .oneshot(convert(
            "/convert/markdown",
            json!({
                "source": "report.pdf",
                "picture_scale": 0,
                "markdown_params": {}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail = body_json(res).await["detail"].as_str().unwrap().to_string();
    assert!(detail.contains("picture_scale"), "got: {detail}");
}

#[tokio::test]
async fn validation_failures_do_not_consume_quota() {
    let app = test_app(1);
    let bad = convert(
        "/convert/markdown",
        json!({ "source": "report.pdf", "picture_scale": 99, "markdown_params": {} }),
    );
    let res = app.clone().oneshot(bad).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The whole quota is still available: this request is admitted and
    // reaches the (unreachable) backend.
    let good = convert(
        "/convert/markdown",
        json!({ "source": "report.pdf", "markdown_params": {} }),
    );
    let res = app.oneshot(good).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn backend_failures_are_opaque() {
    let app = test_app(100);
    let res = app
        .oneshot(convert(
            "/convert/markdown",
            json!({ "source": "report.pdf", "markdown_params": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res).await["detail"], "internal conversion error");
}

#[tokio::test]
async fn exhausted_backends_yield_service_unavailable() {
    let app = test_app(100);
    // First call fails and marks the only backend unhealthy.
    let res = app
        .clone()
        .oneshot(convert(
            "/convert/html",
            json!({ "source": "report.pdf", "html_params": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = app
        .oneshot(convert(
            "/convert/html",
            json!({ "source": "report.pdf", "html_params": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn over_quota_requests_get_429() {
    let app = test_app(1);
    let res = app
        .clone()
        .oneshot(convert(
            "/convert/text",
            json!({ "source": "report.pdf", "text_params": {} }),
        ))
        .await
        .unwrap();
    // Admitted: the failure is the unreachable backend, not the limiter.
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = app
        .oneshot(convert(
            "/convert/text",
            json!({ "source": "report.pdf", "text_params": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body_json(res).await["detail"],
        "Rate limit exceeded. Try again later."
    );
}

#[tokio::test]
async fn metrics_expose_request_counters() {
    let app = test_app(100);
    // Touch the convert path first so the counters are registered.
    let _ = app
        .clone()
        .oneshot(convert(
            "/convert/markdown",
            json!({ "source": "report.pdf", "markdown_params": {} }),
        ))
        .await
        .unwrap();

    let res = app.oneshot(get("/metrics", Some(TEST_API_KEY))).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("docling_requests_total"), "got: {text}");
    assert!(text.contains("docling_cache_misses_total"), "got: {text}");
}
