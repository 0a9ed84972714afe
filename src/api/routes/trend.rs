//! Trend Routes
//!
//! - GET /api/v1/trend - Best-fit line over the history buffer

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::feed::TrendView;

/// GET /api/v1/trend
///
/// Ordinary least squares fit of temperature against buffer index.
/// Responds 422 while fewer than two readings are buffered.
pub async fn get_trend(State(state): State<Arc<AppState>>) -> ApiResult<Json<TrendView>> {
    if !state.variant().shows_trend() {
        return Err(ApiError::FeatureDisabled(format!(
            "trend chart is not shown by the {} dashboard",
            state.variant()
        )));
    }

    let trend = state.feed.trend().await?;
    Ok(Json(trend))
}
