//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod call_record_repository;

pub use call_record_repository::*;
