//! Webhook shared-secret check
//!
//! When a secret is configured, `POST /webhook` requires the
//! `x-vapi-secret` header to carry it.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::AppState;

pub const SECRET_HEADER: &str = "x-vapi-secret";

/// Byte comparison whose running time does not depend on where the inputs differ
fn secrets_match(expected: &[u8], provided: &[u8]) -> bool {
    if expected.len() != provided.len() {
        return false;
    }
    expected
        .iter()
        .zip(provided)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Reject webhook deliveries that do not carry the configured secret
pub async fn webhook_secret_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.webhook_secret.as_deref() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(SECRET_HEADER)
        .map(|v| v.as_bytes())
        .unwrap_or_default();

    if secrets_match(expected.as_bytes(), provided) {
        next.run(request).await
    } else {
        tracing::warn!("🚫 Rejected webhook with invalid secret");
        (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": "Invalid webhook secret" })),
        )
            .into_response()
    }
}
