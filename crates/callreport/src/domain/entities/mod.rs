//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - CallRecord: One persisted row per upstream call
//! - CallRecordChanges: Flat attribute set written by an upsert
//! - WebhookMessage: Inbound end-of-call notification

mod call_record;
mod webhook_message;

pub use call_record::*;
pub use webhook_message::*;
