//! Manual per-user triggers, mounted in development only.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use dreamloop_core::ContentRecord;
use dreamloop_daily::DispatchReport;
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_daily_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct UserQuery {
    user_id: Option<String>,
}

fn parse_user_id(request_id: &str, query: &UserQuery) -> Result<Uuid, ApiError> {
    let raw = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::new(request_id, "bad_request", "user_id is required"))?;

    Uuid::parse_str(raw).map_err(|_| {
        ApiError::new(
            request_id,
            "bad_request",
            format!("user_id '{raw}' is not a valid UUID"),
        )
    })
}

/// `POST /api/v1/dev/generate-today?user_id=`: get or create today's card.
pub(super) async fn generate_today(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<ContentRecord>>, ApiError> {
    let user_id = parse_user_id(&req_id.0, &query)?;

    let record = state
        .orchestrator
        .materialize_today(user_id, Utc::now())
        .await
        .map_err(|e| map_daily_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: record,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/v1/dev/push-today?user_id=`: push today's stored card.
pub(super) async fn push_today(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<DispatchReport>>, ApiError> {
    let user_id = parse_user_id(&req_id.0, &query)?;

    let report = state
        .orchestrator
        .push_today(user_id, Utc::now())
        .await
        .map_err(|e| map_daily_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}
