//! Domain Services
//!
//! Stateless transformations that belong to the domain but not to a single
//! entity.

mod payload_reducer;
mod time_normalizer;

pub use payload_reducer::*;
pub use time_normalizer::*;
