//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (first reading sampled)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Returns 200 once the feed has produced a reading and is still running.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match feed_status(&state).await {
        "running" => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let feed = feed_status(&state).await;

    let overall_status = match feed {
        "running" => "healthy",
        "waiting" => "starting",
        _ => "unhealthy",
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        feed: feed.to_string(),
        variant: state.variant().to_string(),
        readings_sampled: state.feed.tick_count(),
        ws_connections: state.ws_connection_count().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Feed state: running, waiting (no reading yet) or stopped
async fn feed_status(state: &AppState) -> &'static str {
    if state.feed.is_shutdown() {
        "stopped"
    } else if state.feed.tick_count() == 0 {
        "waiting"
    } else {
        "running"
    }
}
