//! Call Routes - Dashboard Access to Stored Call Reports
//!
//! HTTP handlers that delegate to CallReportService.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use callreport::{CallRecordQuery, DomainError};

use crate::models::{CallReportResponse, ListCallsParams, PaginatedCallsResponse};
use crate::AppState;

/// List call reports, newest first
///
/// With neither `date_from` nor `date_to`, only calls from the default
/// window (30 days unless configured) are returned.
#[utoipa::path(
    get,
    path = "/calls",
    params(ListCallsParams),
    responses(
        (status = 200, description = "Page of call reports", body = PaginatedCallsResponse),
        (status = 400, description = "Invalid paging or date range"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Calls"
)]
pub async fn list_calls(
    State(state): State<AppState>,
    Query(params): Query<ListCallsParams>,
) -> Result<Json<PaginatedCallsResponse>, (StatusCode, String)> {
    let normalizer = state.call_service.normalizer();

    let date_to = normalizer.normalize(params.date_to);
    let date_from = match (normalizer.normalize(params.date_from), &date_to) {
        (None, None) => Some(normalizer.now() - state.default_window),
        (from, _) => from,
    };

    if let (Some(from), Some(to)) = (&date_from, &date_to) {
        if from > to {
            return Err((
                StatusCode::BAD_REQUEST,
                "`date_from` must be before `date_to`".to_string(),
            ));
        }
    }

    let query = CallRecordQuery::new(
        params.page,
        params.page_size,
        params.search,
        date_from,
        date_to,
    )
    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let page = state
        .call_service
        .list(&query)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(PaginatedCallsResponse::from_page(
        page,
        query.page(),
        query.page_size(),
    )))
}

/// Get a call report by voice platform call ID
#[utoipa::path(
    get,
    path = "/calls/{call_id}",
    params(
        ("call_id" = String, Path, description = "Voice platform call ID")
    ),
    responses(
        (status = 200, description = "Call report found", body = CallReportResponse),
        (status = 404, description = "Call not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Calls"
)]
pub async fn get_call(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<CallReportResponse>, (StatusCode, String)> {
    let record = state
        .call_service
        .get(&call_id)
        .await
        .map_err(|e| match e {
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "Call not found".to_string()),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    Ok(Json(record.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calls", get(list_calls))
        .route("/calls/:call_id", get(get_call))
}
