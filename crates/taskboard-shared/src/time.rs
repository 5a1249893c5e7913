use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

/// Zone the store writes wall-clock datetimes in.
///
/// Comment stamps are persisted without an offset; this converts them to and
/// from canonical UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimezone {
    offset: FixedOffset,
}

impl StoreTimezone {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Interpret a stored wall-clock datetime as UTC. `None` when the shift
    /// leaves chrono's representable range.
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let shift = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        local
            .checked_sub_signed(shift)
            .map(|utc| Utc.from_utc_datetime(&utc))
    }

    pub fn from_utc(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    /// Current wall-clock time in the store zone.
    pub fn now(&self) -> NaiveDateTime {
        self.from_utc(Utc::now())
    }
}

impl Default for StoreTimezone {
    fn default() -> Self {
        Self::utc()
    }
}
