//! Entry points for the two places the application offers replacement slots.
//!
//! Both build an [`ExclusionDescriptor`] and a duration from the session being
//! vacated and hand off to [`SlotEngine::find_open_slots`].

use crate::dates::{parse_clock_time, parse_date, Timestamp};
use crate::engine::{SlotEngine, SlotRequest};
use crate::error::{Result, SlotError};
use crate::interval::MINUTES_PER_DAY;
use crate::occupancy::LoggedSpan;
use crate::schedule::{
    ExclusionDescriptor, LoggedSession, RecurringSessionTemplate, ScheduleSource,
};
use crate::verify::OpenSlot;

/// Slots for making up a session the student did not attend.
///
/// The missed session is excluded from occupancy and the replacement must be
/// as long as the missed session was.
///
/// # Errors
/// `SlotError::InvalidDate` if the missed session's timestamps or the target
/// date cannot be parsed, plus anything [`SlotEngine::find_open_slots`] returns.
pub fn reschedule_after_no_show<S: ScheduleSource + ?Sized>(
    engine: &SlotEngine,
    source: &S,
    site: &str,
    missed: &LoggedSession,
    target_date: &str,
    now: &Timestamp,
) -> Result<Vec<OpenSlot>> {
    let config = engine.config();
    let span = LoggedSpan::of(missed, config.tz()?)?;

    let exclusion = ExclusionDescriptor {
        student_ids: vec![missed.student_id.clone()],
        start_minutes: span.start_minutes,
        end_minutes: span.end_minutes,
        date: Some(span.date),
    };
    let duration_minutes = span.end_or(config.default_session_minutes) - span.start_minutes;

    let request = SlotRequest {
        target_date: target_date.to_string(),
        duration_minutes,
        exclusion,
    };
    engine.find_open_slots(source, site, &request, now)
}

/// Slots for moving a recurring session off a date it was cancelled for.
///
/// The template's own occurrence is excluded and the replacement must be as
/// long as the template's sessions.
///
/// # Errors
/// `SlotError::InvalidTime` if the template's start time is unusable,
/// `SlotError::InvalidDate` for an unparseable cancelled or target date,
/// plus anything [`SlotEngine::find_open_slots`] returns.
pub fn cancellation_options<S: ScheduleSource + ?Sized>(
    engine: &SlotEngine,
    source: &S,
    site: &str,
    template: &RecurringSessionTemplate,
    cancelled_date: &str,
    target_date: &str,
    now: &Timestamp,
) -> Result<Vec<OpenSlot>> {
    let config = engine.config();
    let start_minutes = parse_clock_time(&template.start_time)
        .ok_or_else(|| SlotError::InvalidTime(template.start_time.clone()))?;
    let length = template.session_length(config.default_session_minutes);
    let end_minutes = start_minutes.saturating_add(length).min(MINUTES_PER_DAY);

    let exclusion = ExclusionDescriptor {
        student_ids: template.student_ids.clone(),
        start_minutes,
        end_minutes: Some(end_minutes),
        date: Some(parse_date(cancelled_date)?),
    };

    let request = SlotRequest {
        target_date: target_date.to_string(),
        duration_minutes: end_minutes - start_minutes,
        exclusion,
    };
    engine.find_open_slots(source, site, &request, now)
}
