//! Compute open windows inside operating hours from a day's occupied intervals.
//!
//! Occupied intervals are merged, then the gaps between them are walked with a
//! cursor the same way free time is derived from merged busy periods. Each gap
//! is clipped to `[earliest_start, work_end]` and kept whole if it can hold the
//! required duration.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::config::EngineConfig;
use crate::dates::{is_same_day, minute_of_day};
use crate::interval::{merge, TimeInterval};
use crate::schedule::{ExclusionDescriptor, OperatingHours};

/// Find every contiguous gap of at least `required_minutes` within operating
/// hours that starts no earlier than `earliest_start`.
///
/// Gaps are returned whole and sorted by start; a 3-hour gap is one window,
/// not a series of fixed-size chunks.
pub fn compute_open_slots(
    occupied: &[TimeInterval],
    required_minutes: u32,
    hours: OperatingHours,
    earliest_start: u32,
) -> Vec<TimeInterval> {
    let work_start = hours.start_minute();
    let work_end = hours.end_minute();
    if earliest_start >= work_end || work_start >= work_end {
        return Vec::new();
    }

    let floor = earliest_start.max(work_start);
    let merged = merge(occupied);

    // Only busy time that still matters after the floor and before closing.
    let relevant: Vec<&TimeInterval> = merged
        .iter()
        .filter(|iv| iv.end() > floor && iv.start() < work_end)
        .collect();

    let mut gaps = Vec::new();
    let mut cursor = floor;
    for busy in relevant {
        if let Some(gap) = TimeInterval::new(cursor, busy.start()) {
            gaps.push(gap);
        }
        cursor = cursor.max(busy.end());
    }

    // Trailing gap after the last busy period.
    if let Some(gap) = TimeInterval::new(cursor, work_end) {
        gaps.push(gap);
    }

    gaps.retain(|gap| gap.duration_minutes() >= required_minutes);
    debug!(
        earliest_start,
        required_minutes,
        gaps = gaps.len(),
        "computed open gaps"
    );
    gaps
}

/// The earliest minute of the target day a replacement session may start.
///
/// For any day other than today this is the start of operating hours. For today
/// it is the later of "now" and the end of the vacated session (when that session
/// is on the target date); if that moment falls inside an occupied interval, or
/// within the match tolerance before one begins, it moves to that interval's end,
/// repeatedly, so a slot is never offered mid-session.
///
/// `merged_occupied` must be sorted and non-overlapping (see [`merge`]).
pub fn earliest_start(
    target: NaiveDate,
    now: NaiveDateTime,
    exclusion: &ExclusionDescriptor,
    merged_occupied: &[TimeInterval],
    hours: OperatingHours,
    config: &EngineConfig,
) -> u32 {
    let work_start = hours.start_minute();
    if !is_same_day(target, now) {
        return work_start;
    }

    let mut earliest = minute_of_day(now.time());
    if exclusion.date == Some(target) {
        earliest = earliest.max(exclusion.end_or(config.default_session_minutes));
    }

    let tolerance = config.match_tolerance_minutes;
    for busy in merged_occupied {
        if busy.start() <= earliest.saturating_add(tolerance) && busy.end() > earliest {
            earliest = busy.end();
        }
    }

    earliest.max(work_start)
}
