//! PostgreSQL Repository Implementations

mod call_record_repository;

pub use call_record_repository::PgCallRecordRepository;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::PoolConfig;

/// Open the shared connection pool.
///
/// Connections are pinged before being handed out so that a pool which lived
/// through a network blip does not return dead sockets.
pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.size)
        .max_connections(config.max_connections())
        .acquire_timeout(config.acquire_timeout)
        .test_before_acquire(true)
        .connect(database_url)
        .await
}
