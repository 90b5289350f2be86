//! Site clock - decides which calendar day a view belongs to

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Converts instants to dates in the site time zone
#[derive(Debug, Clone, Copy)]
pub struct SiteClock {
    offset: FixedOffset,
}

impl SiteClock {
    /// Clock for a fixed offset east of UTC; None if the offset is out of range
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Calendar date of an instant in the site time zone
    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.date_of(self.now())
    }
}

impl Default for SiteClock {
    fn default() -> Self {
        Self::utc()
    }
}
