//! In-memory implementation of CallRecordRepository
//!
//! A single mutex guards the whole table, which gives the same
//! insert-or-overwrite atomicity the Postgres `ON CONFLICT` path provides.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use callreport::{
    CallRecord, CallRecordChanges, CallRecordPage, CallRecordQuery, CallRecordRepository,
    DomainError,
};

#[derive(Default)]
pub struct InMemoryCallRecordRepository {
    rows: Mutex<HashMap<String, CallRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryCallRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Repository("connection refused".to_string()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, CallRecord>>, DomainError> {
        self.rows
            .lock()
            .map_err(|_| DomainError::Repository("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CallRecordRepository for InMemoryCallRecordRepository {
    async fn upsert(&self, changes: &CallRecordChanges) -> Result<CallRecord, DomainError> {
        self.check_available()?;
        let mut rows = self.lock()?;

        let zone = changes.updated_at.timezone();
        let (created_at, updated_at) = match rows.get(&changes.call_id) {
            Some(existing) => (
                existing.created_at,
                existing.updated_at.max(changes.updated_at),
            ),
            None => (Utc::now().with_timezone(&zone), changes.updated_at),
        };

        let mut record = CallRecord::from_changes(changes.clone(), created_at);
        record.updated_at = updated_at;
        rows.insert(record.call_id.clone(), record.clone());

        Ok(record)
    }

    async fn query(&self, query: &CallRecordQuery) -> Result<CallRecordPage, DomainError> {
        self.check_available()?;
        let rows = self.lock()?;

        let mut matches: Vec<&CallRecord> = rows
            .values()
            .filter(|r| query.search().map_or(true, |s| r.matches_text(s)))
            .filter(|r| match query.date_from() {
                Some(from) => r.started_at.is_some_and(|t| t >= *from),
                None => true,
            })
            .filter(|r| match query.date_to() {
                Some(to) => r.started_at.is_some_and(|t| t <= *to),
                None => true,
            })
            .collect();

        // started_at descending with nulls last, then call_id
        matches.sort_by(|a, b| match (a.started_at, b.started_at) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.call_id.cmp(&b.call_id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.call_id.cmp(&b.call_id),
        });

        Ok(CallRecordPage {
            total: matches.len() as u64,
            records: matches
                .into_iter()
                .skip(query.offset() as usize)
                .take(query.limit() as usize)
                .cloned()
                .collect(),
        })
    }

    async fn find_by_id(&self, call_id: &str) -> Result<Option<CallRecord>, DomainError> {
        self.check_available()?;
        Ok(self.lock()?.get(call_id).cloned())
    }
}
