//! Call Report Application Service (Use Case)
//!
//! Turns end-of-call webhooks into stored records and serves listings.

use std::sync::Arc;

use callreport::{
    CallRecord, CallRecordPage, CallRecordQuery, CallRecordRepository, DomainError,
    PayloadReducer, TimeNormalizer, WebhookMessage,
};

/// Application service for call report operations
pub struct CallReportService {
    repo: Arc<dyn CallRecordRepository>,
    reducer: PayloadReducer,
}

impl CallReportService {
    pub fn new(repo: Arc<dyn CallRecordRepository>, reducer: PayloadReducer) -> Self {
        Self { repo, reducer }
    }

    pub fn normalizer(&self) -> &TimeNormalizer {
        self.reducer.normalizer()
    }

    /// Reduce an end-of-call message and upsert it.
    ///
    /// Safe to repeat: redelivery of the same message leaves one row whose
    /// `created_at` is unchanged.
    pub async fn record_end_of_call(
        &self,
        message: &WebhookMessage,
    ) -> Result<CallRecord, DomainError> {
        let changes = self.reducer.reduce(message)?;
        let record = self.repo.upsert(&changes).await?;

        tracing::info!(call_id = %record.call_id, "Upserted call report");

        Ok(record)
    }

    /// One page of matching records plus the total match count
    pub async fn list(&self, query: &CallRecordQuery) -> Result<CallRecordPage, DomainError> {
        self.repo.query(query).await
    }

    /// Get a record by external call id
    pub async fn get(&self, call_id: &str) -> Result<CallRecord, DomainError> {
        self.repo
            .find_by_id(call_id)
            .await?
            .ok_or_else(|| DomainError::not_found("CallRecord", call_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCallRecordRepository;
    use callreport::{AnalysisBlock, ArtifactBlock, CallBlock, EventType, ZonedDateTime};
    use chrono::{Duration, TimeZone};
    use chrono_tz::Tz;

    fn service() -> (Arc<InMemoryCallRecordRepository>, CallReportService) {
        let repo = Arc::new(InMemoryCallRecordRepository::new());
        let service = CallReportService::new(repo.clone(), PayloadReducer::default());
        (repo, service)
    }

    fn base_time() -> ZonedDateTime {
        Tz::Australia__Sydney
            .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .unwrap()
    }

    fn call(id: &str, started_at: Option<ZonedDateTime>) -> CallBlock {
        CallBlock {
            id: id.to_string(),
            org_id: Some("org-1".to_string()),
            assistant_id: Some("asst-1".to_string()),
            status: Some("ended".to_string()),
            started_at: started_at.map(|t| t.fixed_offset().into()),
            ended_at: None,
            duration: Some(61.0),
            cost: Some(0.05),
            ended_reason: Some("customer-ended-call".to_string()),
        }
    }

    fn full_message(id: &str, started_at: Option<ZonedDateTime>) -> WebhookMessage {
        WebhookMessage {
            event_type: EventType::EndOfCallReport,
            call: Some(call(id, started_at)),
            artifact: Some(ArtifactBlock {
                transcript: Some("AI: Thanks for calling".to_string()),
                recording_url: Some("https://rec/mono.wav".to_string()),
                stereo_recording_url: Some("https://rec/stereo.wav".to_string()),
            }),
            analysis: Some(AnalysisBlock {
                summary: Some("Caller asked about opening hours".to_string()),
                success_evaluation: Some("true".to_string()),
                structured_data: Some(serde_json::Map::new()),
            }),
        }
    }

    fn call_only_message(id: &str, started_at: Option<ZonedDateTime>) -> WebhookMessage {
        WebhookMessage {
            call: Some(call(id, started_at)),
            ..WebhookMessage::bare(EventType::EndOfCallReport)
        }
    }

    #[tokio::test]
    async fn test_redelivery_is_idempotent() {
        let (repo, service) = service();
        let message = full_message("c-1", Some(base_time()));

        let first = service.record_end_of_call(&message).await.unwrap();
        let second = service.record_end_of_call(&message).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(first.created_at, second.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(first.transcript, second.transcript);
    }

    #[tokio::test]
    async fn test_lesser_payload_overwrites_rather_than_merges() {
        let (_repo, service) = service();

        let full = service
            .record_end_of_call(&full_message("c-2", Some(base_time())))
            .await
            .unwrap();
        assert!(full.summary.is_some());
        assert!(full.transcript.is_some());

        let lesser = service
            .record_end_of_call(&call_only_message("c-2", Some(base_time())))
            .await
            .unwrap();
        assert_eq!(lesser.summary, None);
        assert_eq!(lesser.success_evaluation, None);
        assert_eq!(lesser.structured_data, None);
        assert_eq!(lesser.transcript, None);
        assert_eq!(lesser.created_at, full.created_at);

        let stored = service.get("c-2").await.unwrap();
        assert_eq!(stored.summary, None);
    }

    #[tokio::test]
    async fn test_missing_call_block_never_reaches_store() {
        let (repo, service) = service();
        let message = WebhookMessage::bare(EventType::EndOfCallReport);

        let result = service.record_end_of_call(&message).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_propagates() {
        let (repo, service) = service();
        repo.set_unavailable(true);

        let result = service
            .record_end_of_call(&full_message("c-3", Some(base_time())))
            .await;

        assert!(matches!(result, Err(ref e) if e.is_persistence_failure()));
        assert!(service
            .list(&CallRecordQuery::first_page())
            .await
            .unwrap_err()
            .is_persistence_failure());
    }

    #[tokio::test]
    async fn test_pagination_returns_newest_first() {
        let (_repo, service) = service();
        for i in 0..25 {
            let started = base_time() + Duration::minutes(i);
            service
                .record_end_of_call(&full_message(&format!("c-{i:02}"), Some(started)))
                .await
                .unwrap();
        }

        let first = CallRecordQuery::new(1, 10, None, None, None).unwrap();
        let page = service.list(&first).await.unwrap();
        assert_eq!(page.total, 25);
        let ids: Vec<&str> = page.records.iter().map(|r| r.call_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["c-24", "c-23", "c-22", "c-21", "c-20", "c-19", "c-18", "c-17", "c-16", "c-15"]
        );

        let third = CallRecordQuery::new(3, 10, None, None, None).unwrap();
        let page = service.list(&third).await.unwrap();
        assert_eq!(page.total, 25);
        let ids: Vec<&str> = page.records.iter().map(|r| r.call_id.as_str()).collect();
        assert_eq!(ids, vec!["c-04", "c-03", "c-02", "c-01", "c-00"]);
    }

    #[tokio::test]
    async fn test_undated_records_sort_last() {
        let (_repo, service) = service();
        service
            .record_end_of_call(&full_message("undated", None))
            .await
            .unwrap();
        service
            .record_end_of_call(&full_message("dated", Some(base_time())))
            .await
            .unwrap();

        let page = service.list(&CallRecordQuery::first_page()).await.unwrap();
        let ids: Vec<&str> = page.records.iter().map(|r| r.call_id.as_str()).collect();
        assert_eq!(ids, vec!["dated", "undated"]);
    }

    #[tokio::test]
    async fn test_search_matches_ended_reason_alone() {
        let (_repo, service) = service();

        let mut voicemail = call_only_message("vm", Some(base_time()));
        if let Some(call) = voicemail.call.as_mut() {
            call.ended_reason = Some("voicemail".to_string());
        }
        service.record_end_of_call(&voicemail).await.unwrap();
        service
            .record_end_of_call(&full_message("other", Some(base_time())))
            .await
            .unwrap();

        let query =
            CallRecordQuery::new(1, 20, Some("VoiceMail".to_string()), None, None).unwrap();
        let page = service.list(&query).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].call_id, "vm");
        assert_eq!(page.records[0].transcript, None);
        assert_eq!(page.records[0].summary, None);
    }

    #[tokio::test]
    async fn test_search_leading_space_is_significant() {
        let (_repo, service) = service();
        for (id, transcript) in [("glued", "xvoicemail here"), ("spaced", "left a voicemail")] {
            let mut message = full_message(id, Some(base_time()));
            if let Some(artifact) = message.artifact.as_mut() {
                artifact.transcript = Some(transcript.to_string());
            }
            service.record_end_of_call(&message).await.unwrap();
        }

        let query =
            CallRecordQuery::new(1, 20, Some(" voicemail".to_string()), None, None).unwrap();
        let page = service.list(&query).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].call_id, "spaced");
    }

    #[tokio::test]
    async fn test_date_from_is_inclusive() {
        let (_repo, service) = service();
        let boundary = base_time();
        service
            .record_end_of_call(&full_message("on-boundary", Some(boundary)))
            .await
            .unwrap();
        service
            .record_end_of_call(&full_message(
                "minute-before",
                Some(boundary - Duration::minutes(1)),
            ))
            .await
            .unwrap();

        let query = CallRecordQuery::new(1, 20, None, Some(boundary), None).unwrap();
        let page = service.list(&query).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].call_id, "on-boundary");
    }

    #[tokio::test]
    async fn test_date_to_is_inclusive() {
        let (_repo, service) = service();
        let boundary = base_time();
        service
            .record_end_of_call(&full_message("on-boundary", Some(boundary)))
            .await
            .unwrap();
        service
            .record_end_of_call(&full_message(
                "minute-after",
                Some(boundary + Duration::minutes(1)),
            ))
            .await
            .unwrap();

        let query = CallRecordQuery::new(1, 20, None, None, Some(boundary)).unwrap();
        let page = service.list(&query).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].call_id, "on-boundary");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_for_distinct_ids_both_persist() {
        let (repo, service) = service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let id = format!("call-{}", i % 2);
                    let message = full_message(&id, Some(base_time()));
                    service.record_end_of_call(&message).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.len(), 2);
        assert!(service.get("call-0").await.is_ok());
        assert!(service.get("call-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let (_repo, service) = service();

        let result = service.get("missing").await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
