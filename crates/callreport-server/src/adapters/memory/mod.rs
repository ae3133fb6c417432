//! In-memory Repository Implementations
//!
//! Used by tests to exercise the application and route layers without a
//! database.

mod call_record_repository;

pub use call_record_repository::InMemoryCallRecordRepository;
