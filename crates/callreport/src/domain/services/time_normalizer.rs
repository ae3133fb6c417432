//! TimeNormalizer - Express every timestamp in one display zone

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::{IncomingTimestamp, ZonedDateTime};

/// Zone used when none is configured
pub const DEFAULT_TARGET_ZONE: Tz = Tz::Australia__Sydney;

/// Converts incoming timestamps into the target zone.
///
/// Naive timestamps are assumed to be UTC. Zone-aware timestamps keep their
/// absolute instant and only change representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeNormalizer {
    zone: Tz,
}

impl TimeNormalizer {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn normalize(&self, timestamp: Option<IncomingTimestamp>) -> Option<ZonedDateTime> {
        timestamp.map(|ts| match ts {
            IncomingTimestamp::Zoned(dt) => dt.with_timezone(&self.zone),
            IncomingTimestamp::Naive(naive) => {
                Utc.from_utc_datetime(&naive).with_timezone(&self.zone)
            }
        })
    }

    /// Re-express an instant read back from storage
    pub fn from_utc(&self, instant: DateTime<Utc>) -> ZonedDateTime {
        instant.with_timezone(&self.zone)
    }

    pub fn now(&self) -> ZonedDateTime {
        self.from_utc(Utc::now())
    }
}

impl Default for TimeNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_ZONE)
    }
}
