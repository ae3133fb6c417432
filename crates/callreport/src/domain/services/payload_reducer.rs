//! PayloadReducer - Flatten a webhook message into a CallRecord change set

use crate::domain::{
    errors::DomainError, AnalysisBlock, ArtifactBlock, CallRecordChanges, TimeNormalizer,
    WebhookMessage, ZonedDateTime,
};

/// Maps a nested webhook message onto the flat persisted shape.
///
/// Absent artifact or analysis blocks contribute all-null fields. The
/// resulting change set is a full replacement for any stored row.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadReducer {
    normalizer: TimeNormalizer,
}

impl PayloadReducer {
    pub fn new(normalizer: TimeNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &TimeNormalizer {
        &self.normalizer
    }

    /// Reduce a message, stamping `updated_at` with the current time
    pub fn reduce(&self, message: &WebhookMessage) -> Result<CallRecordChanges, DomainError> {
        self.reduce_at(message, self.normalizer.now())
    }

    /// Reduce a message with an explicit `updated_at`
    pub fn reduce_at(
        &self,
        message: &WebhookMessage,
        now: ZonedDateTime,
    ) -> Result<CallRecordChanges, DomainError> {
        let call = message.call.as_ref().ok_or_else(|| {
            DomainError::Validation(format!("{} missing call data", message.event_type))
        })?;

        let empty_artifact = ArtifactBlock::default();
        let empty_analysis = AnalysisBlock::default();
        let artifact = message.artifact.as_ref().unwrap_or(&empty_artifact);
        let analysis = message.analysis.as_ref().unwrap_or(&empty_analysis);

        Ok(CallRecordChanges {
            call_id: call.id.clone(),
            org_id: call.org_id.clone(),
            assistant_id: call.assistant_id.clone(),
            status: call.status.clone(),
            started_at: self.normalizer.normalize(call.started_at),
            ended_at: self.normalizer.normalize(call.ended_at),
            duration_seconds: call.duration,
            cost: call.cost,
            ended_reason: call.ended_reason.clone(),
            transcript: artifact.transcript.clone(),
            recording_url: artifact.recording_url.clone(),
            stereo_recording_url: artifact.stereo_recording_url.clone(),
            summary: analysis.summary.clone(),
            success_evaluation: analysis.success_evaluation.clone(),
            structured_data: analysis
                .structured_data
                .clone()
                .map(serde_json::Value::Object),
            updated_at: now.with_timezone(&self.normalizer.zone()),
        })
    }
}
