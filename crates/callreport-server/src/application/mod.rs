//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and the HTTP boundary.

mod call_report_service;

pub use call_report_service::CallReportService;
