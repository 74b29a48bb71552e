//! Tests for date/time normalisation.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use slot_engine::dates::{is_same_day, parse_clock_time, parse_date, Timestamp};
use slot_engine::SlotError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn local(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
}

#[test]
fn parse_date_accepts_bare_and_timestamp_forms() {
    assert_eq!(parse_date("2026-03-16").unwrap(), date(2026, 3, 16));
    assert_eq!(parse_date(" 2026-03-16 ").unwrap(), date(2026, 3, 16));
    assert_eq!(parse_date("2026-03-16T00:00:00.000Z").unwrap(), date(2026, 3, 16));
    assert_eq!(parse_date("2026-03-16T23:30:00-05:00").unwrap(), date(2026, 3, 16));
    assert_eq!(parse_date("2026-03-16T09:00:00").unwrap(), date(2026, 3, 16));
}

#[test]
fn parse_date_rejects_garbage() {
    let err = parse_date("next monday").unwrap_err();
    assert_eq!(err, SlotError::InvalidDate("next monday".to_string()));
    assert!(parse_date("2026-02-30").is_err());
    assert!(parse_date("").is_err());
}

#[test]
fn parse_clock_time_handles_seconds_and_rejects_garbage() {
    assert_eq!(parse_clock_time("09:30"), Some(570));
    assert_eq!(parse_clock_time("9:30"), Some(570));
    assert_eq!(parse_clock_time("14:05:59"), Some(845));
    assert_eq!(parse_clock_time("25:00"), None);
    assert_eq!(parse_clock_time("half past nine"), None);
}

#[test]
fn zoned_timestamp_converts_to_site_wall_clock() {
    // 14:00 UTC on 2026-03-16 is 10:00 EDT (DST began 2026-03-08).
    let ts = Timestamp::from_str("2026-03-16T14:00:00Z").unwrap();
    let tz: chrono_tz::Tz = "America/New_York".parse().unwrap();
    assert_eq!(ts.to_local(tz), local("2026-03-16T10:00:00"));
}

#[test]
fn zoned_timestamp_can_cross_into_the_previous_day() {
    let ts = Timestamp::from_str("2026-03-16T02:00:00Z").unwrap();
    let tz: chrono_tz::Tz = "America/Los_Angeles".parse().unwrap();
    assert_eq!(ts.to_local(tz).date(), date(2026, 3, 15));
}

#[test]
fn naive_timestamp_is_already_local() {
    let ts = Timestamp::from_str("2026-03-16 09:15").unwrap();
    let tz: chrono_tz::Tz = "Asia/Tokyo".parse().unwrap();
    assert_eq!(ts.to_local(tz), local("2026-03-16T09:15:00"));
}

#[test]
fn bare_date_timestamp_is_midnight() {
    let ts = Timestamp::from_str("2026-03-16").unwrap();
    assert_eq!(ts, Timestamp::Local(local("2026-03-16T00:00:00")));
}

#[test]
fn same_day_compares_calendar_dates_only() {
    let now = local("2026-03-16T23:59:00");
    assert!(is_same_day(date(2026, 3, 16), now));
    assert!(!is_same_day(date(2026, 3, 17), now));
    assert!(!is_same_day(date(2025, 3, 16), now));
}
