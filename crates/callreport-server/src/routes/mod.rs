//! Call Report API Routes
//!
//! - /webhook - Voice platform event ingestion
//! - /calls - Dashboard listing and lookup

pub mod calls;
pub mod swagger;
pub mod webhook;
