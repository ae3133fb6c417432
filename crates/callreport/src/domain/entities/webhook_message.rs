//! WebhookMessage - Inbound notification from the voice platform
//!
//! Every sub-block other than the type tag is optional on the wire. The
//! platform sends artifact and analysis data only once it has produced them,
//! so their absence is a normal case rather than an error.

use serde::{de::Error as _, Deserialize, Deserializer};
use utoipa::ToSchema;

use crate::domain::{EventType, IncomingTimestamp};

/// Top-level webhook body: `{"message": {...}}`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WebhookEnvelope {
    pub message: WebhookMessage,
}

/// Webhook message with its type tag and optional blocks
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WebhookMessage {
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "end-of-call-report")]
    pub event_type: EventType,
    pub call: Option<CallBlock>,
    pub artifact: Option<ArtifactBlock>,
    pub analysis: Option<AnalysisBlock>,
}

/// Call metadata
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallBlock {
    pub id: String,
    pub org_id: Option<String>,
    pub assistant_id: Option<String>,
    pub status: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub started_at: Option<IncomingTimestamp>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub ended_at: Option<IncomingTimestamp>,
    /// Seconds
    pub duration: Option<f64>,
    pub cost: Option<f64>,
    pub ended_reason: Option<String>,
}

/// Recording and transcript artifacts
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactBlock {
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    pub stereo_recording_url: Option<String>,
}

/// Post-call analysis results
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBlock {
    pub summary: Option<String>,
    /// Rubric outcome; booleans and numbers are kept in their text form
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub success_evaluation: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub structured_data: Option<serde_json::Map<String, serde_json::Value>>,
}

impl WebhookMessage {
    /// A message carrying only a type tag
    pub fn bare(event_type: impl Into<EventType>) -> Self {
        Self {
            event_type: event_type.into(),
            call: None,
            artifact: None,
            analysis: None,
        }
    }
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "successEvaluation must be a scalar, got {}",
            other
        ))),
    }
}
