//! Dashboard Routes
//!
//! - GET / - Dashboard HTML page
//! - GET /api/v1/snapshot - Everything the page shows, as JSON

use axum::{extract::State, response::Html, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::feed::DashboardSnapshot;

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.as_ref().clone())
}

/// GET /api/v1/snapshot
///
/// Fields the running variant does not show are empty.
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.feed.snapshot().await)
}
