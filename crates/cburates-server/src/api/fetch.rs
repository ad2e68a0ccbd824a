use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use cburates_collector::{collect_rates, RunSummary};
use cburates_core::DayRange;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_collector_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct FetchQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// `GET /fetch` — collects every day in the requested range into the output file.
///
/// Both dates are optional and fall back to the configured defaults.
pub(super) async fn fetch_rates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<FetchQuery>, QueryRejection>,
) -> Result<Json<RunSummary>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::new("bad_request", e.body_text()))?;

    let start = query.start_date.unwrap_or(state.default_start);
    let end = query.end_date.unwrap_or(state.default_end);

    // Reject before queueing behind a run already in progress.
    DayRange::new(start, end).map_err(|e| ApiError::new("bad_request", e.to_string()))?;

    let _run = state.run_lock.lock().await;
    tracing::info!(request_id = %req_id.0, %start, %end, "fetch triggered");

    collect_rates(&state.client, start, end, &state.output_path)
        .await
        .map(Json)
        .map_err(|e| map_collector_error(&req_id.0, &e))
}
