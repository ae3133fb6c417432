//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod call_record_query;
mod event_type;
mod incoming_timestamp;

pub use call_record_query::*;
pub use event_type::*;
pub use incoming_timestamp::*;
