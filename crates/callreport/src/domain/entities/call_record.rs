//! CallRecord - Durable record of a single upstream call
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

/// Timestamp expressed in the configured target zone
pub type ZonedDateTime = DateTime<Tz>;

/// CallRecord - One row per unique external call id
///
/// Every field except the key and the housekeeping timestamps is nullable:
/// a record may exist before artifact or analysis data has been produced
/// upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecord {
    /// Caller-assigned id from the voice platform; never generated here
    pub call_id: String,
    pub org_id: Option<String>,
    pub assistant_id: Option<String>,
    pub status: Option<String>,
    pub started_at: Option<ZonedDateTime>,
    pub ended_at: Option<ZonedDateTime>,
    pub duration_seconds: Option<f64>,
    pub cost: Option<f64>,
    pub ended_reason: Option<String>,
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    pub stereo_recording_url: Option<String>,
    pub summary: Option<String>,
    pub success_evaluation: Option<String>,
    pub structured_data: Option<serde_json::Value>,
    /// Set once by storage on first insert
    pub created_at: ZonedDateTime,
    /// Set on every successful upsert
    pub updated_at: ZonedDateTime,
}

/// Flat attribute set produced from a webhook message.
///
/// Covers every [`CallRecord`] field except `created_at`. An upsert writes
/// all of these columns, so a `None` here clears whatever was stored before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecordChanges {
    pub call_id: String,
    pub org_id: Option<String>,
    pub assistant_id: Option<String>,
    pub status: Option<String>,
    pub started_at: Option<ZonedDateTime>,
    pub ended_at: Option<ZonedDateTime>,
    pub duration_seconds: Option<f64>,
    pub cost: Option<f64>,
    pub ended_reason: Option<String>,
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    pub stereo_recording_url: Option<String>,
    pub summary: Option<String>,
    pub success_evaluation: Option<String>,
    pub structured_data: Option<serde_json::Value>,
    pub updated_at: ZonedDateTime,
}

impl CallRecord {
    /// Materialize a record from an applied change set.
    ///
    /// `created_at` comes from whatever row already existed, or from the
    /// write time on first insert.
    pub fn from_changes(changes: CallRecordChanges, created_at: ZonedDateTime) -> Self {
        Self {
            call_id: changes.call_id,
            org_id: changes.org_id,
            assistant_id: changes.assistant_id,
            status: changes.status,
            started_at: changes.started_at,
            ended_at: changes.ended_at,
            duration_seconds: changes.duration_seconds,
            cost: changes.cost,
            ended_reason: changes.ended_reason,
            transcript: changes.transcript,
            recording_url: changes.recording_url,
            stereo_recording_url: changes.stereo_recording_url,
            summary: changes.summary,
            success_evaluation: changes.success_evaluation,
            structured_data: changes.structured_data,
            created_at,
            updated_at: changes.updated_at,
        }
    }

    /// Case-insensitive substring match against transcript, summary, or
    /// ended reason.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.transcript, &self.summary, &self.ended_reason]
            .into_iter()
            .flatten()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

/// One page of a listing plus the total number of matches
#[derive(Debug, Clone, Default)]
pub struct CallRecordPage {
    /// Matching records before pagination
    pub total: u64,
    /// Ordered by `started_at` descending, nulls last
    pub records: Vec<CallRecord>,
}
