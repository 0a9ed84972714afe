//! Reading Routes
//!
//! - GET /api/v1/readings/latest - Most recent reading
//! - GET /api/v1/readings - History buffer contents
//! - GET /api/v1/readings/table - History as a data table (json or csv)

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use std::sync::Arc;

use crate::api::dto::{HistoryResponse, TableParams, TableResponse, TableRow};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::reading::Reading;

const TABLE_COLUMNS: [&str; 3] = ["index", "temp", "timestamp"];

/// GET /api/v1/readings/latest
///
/// Returns 503 until the first reading has been sampled.
pub async fn latest_reading(State(state): State<Arc<AppState>>) -> ApiResult<Json<Reading>> {
    let reading = state.feed.require_latest().await?;
    Ok(Json(reading))
}

/// GET /api/v1/readings
///
/// History buffer contents, oldest first.
pub async fn list_readings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<HistoryResponse>> {
    ensure_history_enabled(&state)?;

    let readings = state.feed.history().await;
    Ok(Json(HistoryResponse {
        capacity: state.feed.config().history_capacity,
        count: readings.len(),
        readings,
    }))
}

/// GET /api/v1/readings/table
///
/// The data table widget: one row per buffered reading.
pub async fn reading_table(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TableParams>,
) -> ApiResult<Response> {
    ensure_history_enabled(&state)?;

    let rows = TableRow::from_readings(&state.feed.history().await);

    match params.format.to_lowercase().as_str() {
        "json" => Ok(Json(TableResponse {
            columns: TABLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        })
        .into_response()),
        "csv" => {
            let body = format_csv(&rows, state.feed.config().generator.decimals)?;
            let filename = format!(
                "antarctic_readings_{}.csv",
                Local::now().format("%Y%m%d_%H%M%S")
            );

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                Body::from(body),
            )
                .into_response())
        }
        other => Err(ApiError::Validation(format!(
            "Unsupported table format: {} (use json or csv)",
            other
        ))),
    }
}

fn ensure_history_enabled(state: &AppState) -> ApiResult<()> {
    if state.variant().shows_history() {
        Ok(())
    } else {
        Err(ApiError::FeatureDisabled(format!(
            "reading history is not shown by the {} dashboard",
            state.variant()
        )))
    }
}

/// Format table rows as CSV with a header line, temperatures to `decimals` places
fn format_csv(rows: &[TableRow], decimals: u32) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(TABLE_COLUMNS)
        .map_err(|e| ApiError::Internal(format!("CSV write failed: {}", e)))?;
    for row in rows {
        writer
            .write_record([
                row.index.to_string(),
                format!("{:.*}", decimals as usize, row.temp),
                row.timestamp.clone(),
            ])
            .map_err(|e| ApiError::Internal(format!("CSV write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_csv() {
        let rows = vec![
            TableRow {
                index: 0,
                temp: -17.2,
                timestamp: "2024-01-15 10:30:00".to_string(),
            },
            TableRow {
                index: 1,
                temp: -16.0,
                timestamp: "2024-01-15 10:30:01".to_string(),
            },
        ];

        let csv = format_csv(&rows, 1).unwrap();
        assert_eq!(
            csv,
            "index,temp,timestamp\n0,-17.2,2024-01-15 10:30:00\n1,-16.0,2024-01-15 10:30:01\n"
        );

        let csv = format_csv(&rows[1..], 2).unwrap();
        assert_eq!(csv, "index,temp,timestamp\n1,-16.00,2024-01-15 10:30:01\n");
    }

    #[test]
    fn test_format_csv_empty() {
        assert_eq!(format_csv(&[], 1).unwrap(), "index,temp,timestamp\n");
    }
}
