use axum::{extract::State, Extension, Json};
use chrono::Utc;
use dreamloop_daily::{RunResult, RunTotals};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct DailyRunData {
    results: Vec<RunResult>,
    totals: RunTotals,
}

/// `POST /api/v1/cron/daily`: one pass over every eligible profile.
pub(super) async fn run_daily(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<DailyRunData>>, ApiError> {
    let results = state.orchestrator.run(Utc::now()).await.map_err(|e| {
        tracing::error!(error = %e, "cron: daily run aborted");
        ApiError::new(
            req_id.0.clone(),
            "internal_error",
            "failed to load eligible profiles",
        )
    })?;

    let totals = RunTotals::from_results(&results);
    Ok(Json(ApiResponse {
        data: DailyRunData { results, totals },
        meta: ResponseMeta::new(req_id.0),
    }))
}
