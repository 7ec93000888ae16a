//! Day windows for event queries.
//!
//! A window always starts at a local midnight and is expressed only by that
//! lower bound. It has no upper bound, so an event logged with a future time
//! falls inside every window that starts before it.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone};

use crate::error::DomainError;

/// Which days a read view covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// From local midnight today
    Today,
    /// Today plus the preceding `n - 1` days
    LastDays(u32),
}

impl TimeWindow {
    /// Build a multi-day window, rejecting counts that cover no day at all
    pub fn last_days(n: i64) -> Result<Self, DomainError> {
        if n <= 0 {
            return Err(DomainError::InvalidWindow(n));
        }
        u32::try_from(n)
            .map(Self::LastDays)
            .map_err(|_| DomainError::InvalidInput(format!("window of {} days is too large", n)))
    }

    /// Local midnight of the first day in the window, relative to `now`
    pub fn window_start<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<DateTime<Tz>, DomainError> {
        let today = now.date_naive();
        let first_day = match self {
            Self::Today => Some(today),
            Self::LastDays(n) => today.checked_sub_signed(Duration::days(i64::from(*n) - 1)),
        }
        .ok_or_else(|| DomainError::InvalidInput(format!("{:?} reaches before the calendar", self)))?;

        local_midnight(&now.timezone(), first_day)
    }
}

/// First instant of `day` in `tz`.
///
/// Where a DST transition skips midnight, the day starts at the first valid
/// local time after it.
pub fn local_midnight<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Result<DateTime<Tz>, DomainError> {
    let midnight = day.and_time(chrono::NaiveTime::MIN);

    for shift in 0..=3 {
        let candidate = midnight + Duration::minutes(shift * 30);
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(instant) => return Ok(instant),
            LocalResult::Ambiguous(earliest, _) => return Ok(earliest),
            LocalResult::None => continue,
        }
    }

    Err(DomainError::InvalidInput(format!("no local midnight on {}", day)))
}

/// "HH:MM" in 24-hour time, for the today list
pub fn display_time<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.format("%H:%M").to_string()
}
