use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use docling_gateway::app::build_app;
use docling_gateway::cache::ResultCache;
use docling_gateway::config::Args;
use docling_gateway::load_balancer::{LoadBalancer, health_checker};
use docling_gateway::metrics::TRACKED_CLIENTS;
use docling_gateway::models::QueuedJob;
use docling_gateway::rate_limit::RateLimiter;
use docling_gateway::state::AppState;
use docling_gateway::worker::convert_worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (job_tx, job_rx) = mpsc::channel::<QueuedJob>(100);

    let load_balancer = Arc::new(LoadBalancer::new(&args.backends));
    let cache = Arc::new(ResultCache::new());

    let state = Arc::new(AppState {
        api_key: args.api_key.clone(),
        cache: cache.clone(),
        load_balancer: load_balancer.clone(),
        rate_limiter: RateLimiter::new(args.rate_limit, Duration::from_secs(args.rate_window)),
        job_tx,
    });

    tokio::spawn(convert_worker(
        job_rx,
        reqwest::Client::new(),
        load_balancer.clone(),
        cache,
    ));

    tokio::spawn(health_checker(
        load_balancer,
        reqwest::Client::new(),
        Duration::from_secs(args.health_interval),
    ));

    // Sweep idle clients so the limiter map does not grow for the life of
    // the process.
    let sweep_state = state.clone();
    let sweep_interval = Duration::from_secs(args.sweep_interval);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            sweep_state.rate_limiter.sweep();
            TRACKED_CLIENTS.set(sweep_state.rate_limiter.tracked_clients() as f64);
        }
    });

    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(port = args.port, backends = %args.backends, "gateway listening");
    info!(
        rate_limit = args.rate_limit,
        rate_window_secs = args.rate_window,
        "per client rate limit"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
