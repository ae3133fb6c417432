//! Webhook acknowledgement

use serde::Serialize;
use utoipa::ToSchema;

/// Body returned for every accepted webhook delivery
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
    /// False when the event type is acknowledged but not stored
    pub processed: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl WebhookAck {
    pub fn ignored(event_type: impl Into<String>) -> Self {
        Self {
            received: true,
            processed: false,
            event_type: Some(event_type.into()),
            call_id: None,
        }
    }

    pub fn processed(call_id: impl Into<String>) -> Self {
        Self {
            received: true,
            processed: true,
            event_type: None,
            call_id: Some(call_id.into()),
        }
    }
}
