//! Normalisation of the mixed date/time formats that arrive from the data layer.
//!
//! Calendar dates show up either as bare `yyyy-MM-dd` strings or as full ISO 8601
//! timestamps; clock times as `HH:mm` or `HH:mm:ss`. Everything is converted here
//! so the resolver and calculator only ever see [`NaiveDate`] and minutes-of-day.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a calendar date from either `yyyy-MM-dd` or an ISO 8601 timestamp.
///
/// Timestamps contribute the calendar date exactly as written; no timezone
/// shift is applied, so `"2026-03-16T00:00:00.000Z"` is March 16.
///
/// # Errors
/// Returns `SlotError::InvalidDate` if the string is neither form.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    match Timestamp::from_str(trimmed)? {
        Timestamp::Zoned(dt) => Ok(dt.date_naive()),
        Timestamp::Local(ndt) => Ok(ndt.date()),
    }
}

/// Parse an `HH:mm` (or `HH:mm:ss`) clock time into minutes since midnight.
///
/// Returns `None` for anything unparseable; callers decide whether that is a
/// fallback or an error.
pub fn parse_clock_time(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
        .map(minute_of_day)
}

/// Minutes elapsed since local midnight, ignoring seconds.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Whether `target` is the same calendar day as the local wall-clock `now`.
///
/// The date comparison and the `yyyy-MM-dd` string comparison are both applied;
/// either one matching is enough.
pub fn is_same_day(target: NaiveDate, now: NaiveDateTime) -> bool {
    let today = now.date();
    target == today
        || target.format("%Y-%m-%d").to_string() == today.format("%Y-%m-%d").to_string()
}

/// A point in time as supplied by a caller or the data layer.
///
/// Timestamps with an explicit offset are converted to the site's wall clock;
/// timestamps without one are taken to already be site-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

impl Timestamp {
    /// The wall-clock date and time of this instant at the site.
    pub fn to_local(&self, tz: Tz) -> NaiveDateTime {
        match self {
            Timestamp::Zoned(dt) => dt.with_timezone(&tz).naive_local(),
            Timestamp::Local(ndt) => *ndt,
        }
    }
}

impl FromStr for Timestamp {
    type Err = SlotError;

    /// Accepts RFC 3339 (`2026-03-16T09:00:00Z`, `...+02:00`), naive ISO 8601
    /// (`2026-03-16T09:00:00`, `2026-03-16 09:00`), or a bare date (midnight).
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Timestamp::Zoned(dt));
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Timestamp::Local(ndt));
            }
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(|d| Timestamp::Local(d.and_time(NaiveTime::MIN)))
            .map_err(|_| SlotError::InvalidDate(s.to_string()))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Zoned(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(ndt: NaiveDateTime) -> Self {
        Timestamp::Local(ndt)
    }
}
