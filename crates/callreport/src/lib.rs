//! Call Report Domain Library
//!
//! Core domain types and interfaces for ingesting voice-platform
//! end-of-call reports and serving them back to a dashboard.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: CallRecord, CallRecordChanges, inbound webhook message
//!   - `value_objects/`: EventType, IncomingTimestamp, CallRecordQuery
//!   - `services/`: TimeNormalizer, PayloadReducer
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use callreport::{PayloadReducer, TimeNormalizer, CallRecordRepository};
//!
//! let reducer = PayloadReducer::new(TimeNormalizer::default());
//! let changes = reducer.reduce(&payload.message)?;
//! let record = repo.upsert(&changes).await?;
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AnalysisBlock, ArtifactBlock, CallBlock, CallRecord, CallRecordChanges, CallRecordPage,
    CallRecordQuery, DomainError, EventType, IncomingTimestamp, PayloadReducer, TimeNormalizer,
    WebhookEnvelope, WebhookMessage, ZonedDateTime, DEFAULT_PAGE_SIZE, DEFAULT_TARGET_ZONE,
    MAX_PAGE_SIZE,
};
pub use ports::CallRecordRepository;
