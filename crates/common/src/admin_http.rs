//! Lightweight admin HTTP server
//!
//! Exposes `/healthz` and `/metrics` endpoints, with metrics provided by caller.

use axum::http::StatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

async fn healthz() -> &'static str { "OK" }

pub fn admin_router(metrics_fn: fn() -> (StatusCode, String)) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(move || async move { metrics_fn() }))
}

/// Bind the admin listener and serve it on the current runtime.
/// Bind errors are returned; serve errors are logged from the spawned task.
pub async fn spawn_admin_server(
    addr: &str,
    metrics_fn: fn() -> (StatusCode, String),
) -> anyhow::Result<JoinHandle<()>> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, event = "admin_listening", "admin server listening");
    let router = admin_router(metrics_fn);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!(error = %e, event = "admin_serve_failed", "admin server stopped");
        }
    }))
}
