//! IncomingTimestamp - A timestamp as received, with or without zone info

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Timestamp as it arrived on the wire.
///
/// Upstream payloads and dashboard query strings are not consistent about
/// carrying an offset, so the two cases are kept apart until the
/// [`TimeNormalizer`](crate::TimeNormalizer) resolves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum IncomingTimestamp {
    /// Carried an explicit offset (`Z`, `+10:00`, ...)
    Zoned(DateTime<FixedOffset>),
    /// No zone information
    Naive(NaiveDateTime),
}

const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl std::str::FromStr for IncomingTimestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(IncomingTimestamp::Zoned(dt));
        }
        for fmt in ZONED_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Ok(IncomingTimestamp::Zoned(dt));
            }
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(IncomingTimestamp::Naive(dt));
            }
        }
        if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(IncomingTimestamp::Naive(midnight));
        }

        Err(format!("Invalid timestamp: {}", s))
    }
}

impl TryFrom<String> for IncomingTimestamp {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateTime<FixedOffset>> for IncomingTimestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        IncomingTimestamp::Zoned(dt)
    }
}

impl From<NaiveDateTime> for IncomingTimestamp {
    fn from(dt: NaiveDateTime) -> Self {
        IncomingTimestamp::Naive(dt)
    }
}
