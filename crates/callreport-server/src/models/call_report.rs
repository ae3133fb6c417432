//! Call Report DTOs

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use callreport::{CallRecord, CallRecordPage, IncomingTimestamp, DEFAULT_PAGE_SIZE};

/// Call report as served to the dashboard.
///
/// Timestamps carry the offset of the configured display zone.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CallReportResponse {
    pub call_id: String,
    pub org_id: Option<String>,
    pub assistant_id: Option<String>,
    pub status: Option<String>,
    pub started_at: Option<DateTime<FixedOffset>>,
    pub ended_at: Option<DateTime<FixedOffset>>,
    pub duration_seconds: Option<f64>,
    pub cost: Option<f64>,
    pub ended_reason: Option<String>,
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    pub stereo_recording_url: Option<String>,
    pub summary: Option<String>,
    pub success_evaluation: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub structured_data: Option<serde_json::Value>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<CallRecord> for CallReportResponse {
    fn from(record: CallRecord) -> Self {
        Self {
            call_id: record.call_id,
            org_id: record.org_id,
            assistant_id: record.assistant_id,
            status: record.status,
            started_at: record.started_at.map(|t| t.fixed_offset()),
            ended_at: record.ended_at.map(|t| t.fixed_offset()),
            duration_seconds: record.duration_seconds,
            cost: record.cost,
            ended_reason: record.ended_reason,
            transcript: record.transcript,
            recording_url: record.recording_url,
            stereo_recording_url: record.stereo_recording_url,
            summary: record.summary,
            success_evaluation: record.success_evaluation,
            structured_data: record.structured_data,
            created_at: record.created_at.fixed_offset(),
            updated_at: record.updated_at.fixed_offset(),
        }
    }
}

/// One page of call reports
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCallsResponse {
    /// Matching records across all pages
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<CallReportResponse>,
}

impl PaginatedCallsResponse {
    pub fn from_page(page: CallRecordPage, page_number: u32, page_size: u32) -> Self {
        Self {
            total: page.total,
            page: page_number,
            page_size,
            results: page.records.into_iter().map(Into::into).collect(),
        }
    }
}

/// Query string for `GET /calls`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCallsParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(default = 1, minimum = 1)]
    pub page: u32,
    /// Records per page (max 500)
    #[serde(default = "default_page_size")]
    #[param(default = 20, minimum = 1, maximum = 500)]
    pub page_size: u32,
    /// Case-insensitive text matched against transcript, summary, ended_reason
    pub search: Option<String>,
    /// Calls started on or after this instant (ISO 8601, no offset = UTC)
    #[param(value_type = Option<String>, format = DateTime)]
    pub date_from: Option<IncomingTimestamp>,
    /// Calls started on or before this instant (ISO 8601, no offset = UTC)
    #[param(value_type = Option<String>, format = DateTime)]
    pub date_to: Option<IncomingTimestamp>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
