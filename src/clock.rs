use chrono::{NaiveDate, TimeDelta, Utc};

/// Default civil offset: Brasília time, UTC−03:00 with no daylight saving.
pub const BRASILIA_UTC_OFFSET_MINUTES: i32 = -180;

/// Supplies "today" as a civil date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock pinned to a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOffsetClock {
    utc_offset_minutes: i32,
}

impl FixedOffsetClock {
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }

    pub fn brasilia() -> Self {
        Self::new(BRASILIA_UTC_OFFSET_MINUTES)
    }

    pub fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }
}

impl Default for FixedOffsetClock {
    fn default() -> Self {
        Self::brasilia()
    }
}

impl Clock for FixedOffsetClock {
    fn today(&self) -> NaiveDate {
        let local = Utc::now().naive_utc() + TimeDelta::minutes(i64::from(self.utc_offset_minutes));
        local.date()
    }
}

/// A clock frozen on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
