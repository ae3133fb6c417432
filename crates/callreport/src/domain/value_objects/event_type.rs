//! EventType - Webhook message type tag

use serde::{Deserialize, Serialize};

/// Type tag carried by every inbound webhook message.
///
/// Only `end-of-call-report` is processed; every other tag is kept verbatim
/// so it can be echoed back in the acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    EndOfCallReport,
    Other(String),
}

impl EventType {
    pub const END_OF_CALL_REPORT: &'static str = "end-of-call-report";

    /// Whether messages of this type are persisted
    pub fn is_handled(&self) -> bool {
        matches!(self, EventType::EndOfCallReport)
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::EndOfCallReport => Self::END_OF_CALL_REPORT,
            EventType::Other(tag) => tag,
        }
    }
}

impl From<String> for EventType {
    fn from(tag: String) -> Self {
        if tag == Self::END_OF_CALL_REPORT {
            EventType::EndOfCallReport
        } else {
            EventType::Other(tag)
        }
    }
}

impl From<&str> for EventType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<EventType> for String {
    fn from(event: EventType) -> Self {
        match event {
            EventType::EndOfCallReport => EventType::END_OF_CALL_REPORT.to_string(),
            EventType::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
