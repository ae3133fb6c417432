//! CallRecord Repository Port
//!
//! Abstract interface for CallRecord persistence operations.

use async_trait::async_trait;

use crate::domain::{
    errors::DomainError, CallRecord, CallRecordChanges, CallRecordPage, CallRecordQuery,
};

/// Repository interface for CallRecord entities
///
/// Implementations report every storage fault as
/// [`DomainError::Repository`] and never commit a partial row.
#[async_trait]
pub trait CallRecordRepository: Send + Sync {
    /// Insert the record, or overwrite every non-key column of the existing
    /// row with the same `call_id`, and return the row as written.
    ///
    /// Must be a single atomic operation: two concurrent upserts for one id
    /// may never both take the insert path. `created_at` is only written on
    /// insert.
    ///
    /// Note: this is a full overwrite. Fields that are `None` in `changes`
    /// clear previously stored values, so a less complete redelivery erases
    /// data from a fuller one. A partial-merge mode is a candidate for later.
    async fn upsert(&self, changes: &CallRecordChanges) -> Result<CallRecord, DomainError>;

    /// Count matches and fetch one page, both from the same snapshot
    async fn query(&self, query: &CallRecordQuery) -> Result<CallRecordPage, DomainError>;

    /// Find a record by its external call id
    async fn find_by_id(&self, call_id: &str) -> Result<Option<CallRecord>, DomainError>;
}
