//! Call Report Data Models
//!
//! - CallReport: dashboard-facing record and page shapes
//! - Webhook: acknowledgement returned to the voice platform

mod call_report;
mod webhook;

pub use call_report::*;
pub use webhook::*;
