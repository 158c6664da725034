//! HTTP gateway exposing document conversion as a web API.
//!
//! Callers authenticate with an API key, pass a per-client sliding-window
//! rate limit, and have their conversion job forwarded to an external
//! document-conversion backend. Parsing, layout analysis, and vision models
//! all live in that backend; this crate is the plumbing in front of it.

pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod load_balancer;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod worker;

pub use error::ApiError;
pub use rate_limit::RateLimiter;
