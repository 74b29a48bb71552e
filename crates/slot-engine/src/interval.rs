//! Half-open time-of-day intervals measured in minutes since local midnight.
//!
//! Intervals are sorted by start time and folded together when they overlap or
//! touch, mirroring how busy periods are merged before gaps are computed.

use serde::Serialize;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A `[start, end)` range of minutes within a single day.
///
/// Invariant: `start < end <= 1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimeInterval {
    start: u32,
    end: u32,
}

impl TimeInterval {
    /// Build an interval, returning `None` when the range is empty, inverted,
    /// or extends past the end of the day.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start < end && end <= MINUTES_PER_DAY).then_some(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }

    /// Whether `minute` falls inside the half-open range.
    pub fn contains(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }

    /// Render as `"h:mm AM - h:mm PM"`.
    pub fn label(&self) -> String {
        format!("{} - {}", format_minutes(self.start), format_minutes(self.end))
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Two intervals overlap iff `a.start < b.end && a.end > b.start`.
///
/// Touching intervals (one ends exactly where the other starts) do not overlap.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.start < b.end && a.end > b.start
}

/// Merge overlapping or touching intervals.
///
/// Returns a sorted, non-overlapping list covering exactly the union of the input.
pub fn merge(intervals: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        if let Some(last) = merged.last_mut() {
            if iv.start <= last.end {
                last.end = last.end.max(iv.end);
                continue;
            }
        }
        merged.push(iv);
    }

    merged
}

/// Format minutes since midnight as a 12-hour clock string (`"9:05 AM"`).
///
/// `1440` renders as `"12:00 AM"` (the following midnight).
pub fn format_minutes(minutes: u32) -> String {
    let hour24 = (minutes / 60) % 24;
    let minute = minutes % 60;
    let meridiem = if hour24 < 12 { "AM" } else { "PM" };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour12, minute, meridiem)
}

/// Parse a 12-hour clock string (`"9:05 AM"`) back into minutes since midnight.
pub fn parse_clock(text: &str) -> Option<u32> {
    let (clock, meridiem) = text.trim().split_once(' ')?;
    let (hour, minute) = clock.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    let hour24 = match meridiem.trim().to_ascii_uppercase().as_str() {
        "AM" => hour % 12,
        "PM" => hour % 12 + 12,
        _ => return None,
    };
    Some(hour24 * 60 + minute)
}

/// Parse a label produced by [`TimeInterval::label`] back into an interval.
///
/// An end of `"12:00 AM"` is read as the end of the day.
pub fn parse_label(label: &str) -> Option<TimeInterval> {
    let (start, end) = label.split_once(" - ")?;
    let start = parse_clock(start)?;
    let end = match parse_clock(end)? {
        0 => MINUTES_PER_DAY,
        m => m,
    };
    TimeInterval::new(start, end)
}

