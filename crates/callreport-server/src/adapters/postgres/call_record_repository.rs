//! PostgreSQL implementation of CallRecordRepository

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use callreport::{
    CallRecord, CallRecordChanges, CallRecordPage, CallRecordQuery, CallRecordRepository,
    DomainError, TimeNormalizer,
};

const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(10);

const COLUMNS: &str = "call_id, org_id, assistant_id, status, started_at, ended_at, \
     duration_seconds, cost, ended_reason, transcript, recording_url, stereo_recording_url, \
     summary, success_evaluation, structured_data, created_at, updated_at";

/// PostgreSQL implementation of CallRecordRepository
pub struct PgCallRecordRepository {
    pool: PgPool,
    normalizer: TimeNormalizer,
    statement_timeout: Duration,
}

impl PgCallRecordRepository {
    pub fn new(pool: PgPool, normalizer: TimeNormalizer) -> Self {
        Self {
            pool,
            normalizer,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    /// Run a storage operation under the statement timeout
    async fn bounded<T, F>(&self, op: &str, fut: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.statement_timeout, fut).await {
            Ok(result) => result.map_err(|e| DomainError::Repository(format!("{op}: {e}"))),
            Err(_) => Err(DomainError::Repository(format!(
                "{op}: timed out after {:?}",
                self.statement_timeout
            ))),
        }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct CallReportRow {
    call_id: String,
    org_id: Option<String>,
    assistant_id: Option<String>,
    status: Option<String>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    duration_seconds: Option<f64>,
    cost: Option<f64>,
    ended_reason: Option<String>,
    transcript: Option<String>,
    recording_url: Option<String>,
    stereo_recording_url: Option<String>,
    summary: Option<String>,
    success_evaluation: Option<String>,
    structured_data: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CallReportRow {
    fn into_record(self, normalizer: &TimeNormalizer) -> CallRecord {
        CallRecord {
            call_id: self.call_id,
            org_id: self.org_id,
            assistant_id: self.assistant_id,
            status: self.status,
            started_at: self.started_at.map(|t| normalizer.from_utc(t)),
            ended_at: self.ended_at.map(|t| normalizer.from_utc(t)),
            duration_seconds: self.duration_seconds,
            cost: self.cost,
            ended_reason: self.ended_reason,
            transcript: self.transcript,
            recording_url: self.recording_url,
            stereo_recording_url: self.stereo_recording_url,
            summary: self.summary,
            success_evaluation: self.success_evaluation,
            structured_data: self.structured_data,
            created_at: normalizer.from_utc(self.created_at),
            updated_at: normalizer.from_utc(self.updated_at),
        }
    }
}

/// Escape LIKE metacharacters so the search term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &CallRecordQuery) {
    qb.push(" WHERE TRUE");

    if let Some(search) = query.search() {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (transcript ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR summary ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR ended_reason ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(from) = query.date_from() {
        qb.push(" AND started_at >= ").push_bind(from.with_timezone(&Utc));
    }
    if let Some(to) = query.date_to() {
        qb.push(" AND started_at <= ").push_bind(to.with_timezone(&Utc));
    }
}

fn count_query(query: &CallRecordQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM call_reports");
    push_filters(&mut qb, query);
    qb
}

fn page_query(query: &CallRecordQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM call_reports"));
    push_filters(&mut qb, query);
    // Rows without a start time sort after every dated row
    qb.push(" ORDER BY started_at DESC NULLS LAST, call_id ASC LIMIT ")
        .push_bind(query.limit() as i64)
        .push(" OFFSET ")
        .push_bind(query.offset() as i64);
    qb
}

#[async_trait]
impl CallRecordRepository for PgCallRecordRepository {
    #[tracing::instrument(level = "debug", skip(self, changes), fields(call_id = %changes.call_id))]
    async fn upsert(&self, changes: &CallRecordChanges) -> Result<CallRecord, DomainError> {
        // created_at is left to the column default and is absent from the
        // update set, so only the insert branch ever writes it.
        let sql = format!(
            r#"
            INSERT INTO call_reports (
                call_id, org_id, assistant_id, status, started_at, ended_at,
                duration_seconds, cost, ended_reason, transcript, recording_url,
                stereo_recording_url, summary, success_evaluation, structured_data, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (call_id) DO UPDATE SET
                org_id = EXCLUDED.org_id,
                assistant_id = EXCLUDED.assistant_id,
                status = EXCLUDED.status,
                started_at = EXCLUDED.started_at,
                ended_at = EXCLUDED.ended_at,
                duration_seconds = EXCLUDED.duration_seconds,
                cost = EXCLUDED.cost,
                ended_reason = EXCLUDED.ended_reason,
                transcript = EXCLUDED.transcript,
                recording_url = EXCLUDED.recording_url,
                stereo_recording_url = EXCLUDED.stereo_recording_url,
                summary = EXCLUDED.summary,
                success_evaluation = EXCLUDED.success_evaluation,
                structured_data = EXCLUDED.structured_data,
                updated_at = GREATEST(call_reports.updated_at, EXCLUDED.updated_at)
            RETURNING {COLUMNS}
            "#
        );

        let row = self
            .bounded(
                "upsert call report",
                sqlx::query_as::<_, CallReportRow>(&sql)
                    .bind(&changes.call_id)
                    .bind(&changes.org_id)
                    .bind(&changes.assistant_id)
                    .bind(&changes.status)
                    .bind(changes.started_at.map(|t| t.with_timezone(&Utc)))
                    .bind(changes.ended_at.map(|t| t.with_timezone(&Utc)))
                    .bind(changes.duration_seconds)
                    .bind(changes.cost)
                    .bind(&changes.ended_reason)
                    .bind(&changes.transcript)
                    .bind(&changes.recording_url)
                    .bind(&changes.stereo_recording_url)
                    .bind(&changes.summary)
                    .bind(&changes.success_evaluation)
                    .bind(&changes.structured_data)
                    .bind(changes.updated_at.with_timezone(&Utc))
                    .fetch_one(&self.pool),
            )
            .await?;

        Ok(row.into_record(&self.normalizer))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn query(&self, query: &CallRecordQuery) -> Result<CallRecordPage, DomainError> {
        let pool = &self.pool;
        let (total, rows) = self
            .bounded("list call reports", async move {
                // Count and page must agree, so both read one snapshot
                let mut tx = pool.begin().await?;
                sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
                    .execute(&mut *tx)
                    .await?;

                let total: i64 = count_query(query)
                    .build_query_scalar()
                    .fetch_one(&mut *tx)
                    .await?;
                let rows: Vec<CallReportRow> = page_query(query)
                    .build_query_as()
                    .fetch_all(&mut *tx)
                    .await?;

                tx.commit().await?;
                Ok::<_, sqlx::Error>((total, rows))
            })
            .await?;

        Ok(CallRecordPage {
            total: total.max(0) as u64,
            records: rows
                .into_iter()
                .map(|row| row.into_record(&self.normalizer))
                .collect(),
        })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_by_id(&self, call_id: &str) -> Result<Option<CallRecord>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM call_reports WHERE call_id = $1");
        let row = self
            .bounded(
                "find call report",
                sqlx::query_as::<_, CallReportRow>(&sql)
                    .bind(call_id)
                    .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(|r| r.into_record(&self.normalizer)))
    }
}
