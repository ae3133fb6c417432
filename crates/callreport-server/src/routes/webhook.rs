//! Webhook Routes - Voice Platform Event Ingestion
//!
//! Every event type is acknowledged; only end-of-call reports are stored.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use callreport::WebhookEnvelope;

use crate::models::WebhookAck;
use crate::AppState;

/// Receive a voice platform webhook
#[utoipa::path(
    post,
    path = "/webhook",
    request_body = WebhookEnvelope,
    params(
        ("x-vapi-secret" = Option<String>, Header, description = "Shared webhook secret")
    ),
    responses(
        (status = 200, description = "Event acknowledged", body = WebhookAck),
        (status = 403, description = "Invalid webhook secret"),
        (status = 422, description = "End-of-call report without call data"),
        (status = 500, description = "Failed to persist call report")
    ),
    tag = "Webhook"
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookEnvelope>,
) -> Result<Json<WebhookAck>, (StatusCode, String)> {
    let message = payload.message;

    if !message.event_type.is_handled() {
        tracing::info!(event_type = %message.event_type, "Ignoring webhook event type");
        return Ok(Json(WebhookAck::ignored(message.event_type.as_str())));
    }

    let record = state
        .call_service
        .record_end_of_call(&message)
        .await
        .map_err(|e| {
            if e.is_persistence_failure() {
                tracing::error!(error = %e, "Failed to persist call report");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to persist call report".to_string(),
                )
            } else {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
        })?;

    Ok(Json(WebhookAck::processed(record.call_id)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(receive_webhook))
}
