//! Resolve a site's templates and logged sessions into occupied intervals for one date.
//!
//! This stage only filters and maps: it decides which records occupy time on the
//! target date and turns each one into a [`TimeInterval`]. Merging is left to
//! [`crate::availability`].

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::dates::{minute_of_day, parse_clock_time, parse_date, Timestamp};
use crate::error::Result;
use crate::interval::{TimeInterval, MINUTES_PER_DAY};
use crate::schedule::{
    ExclusionDescriptor, LoggedSession, RecurrencePattern, RecurringSessionTemplate,
};

/// Whether a recurring template produces a session on `date`.
///
/// Checks run in order and stop at the first failure: active flag, cancelled
/// dates, recurrence pattern, then the `startDate..=endDate` range.
///
/// # Errors
/// Returns `SlotError::InvalidDate` if a date the check needs cannot be parsed.
pub fn template_occurs_on(template: &RecurringSessionTemplate, date: NaiveDate) -> Result<bool> {
    if !template.active {
        return Ok(false);
    }

    for cancelled in &template.cancelled_dates {
        if parse_date(cancelled)? == date {
            return Ok(false);
        }
    }

    let pattern_matches = match template.recurrence_pattern {
        RecurrencePattern::Weekly => {
            let weekday = date.weekday().num_days_from_sunday();
            template.day_of_week.iter().any(|d| u32::from(*d) == weekday)
        }
        RecurrencePattern::SpecificDates => {
            let mut found = false;
            for specific in &template.specific_dates {
                if parse_date(specific)? == date {
                    found = true;
                    break;
                }
            }
            found
        }
        RecurrencePattern::Daily => true,
        RecurrencePattern::None => date == parse_date(&template.start_date)?,
    };
    if !pattern_matches {
        return Ok(false);
    }

    if date < parse_date(&template.start_date)? {
        return Ok(false);
    }
    if let Some(end_date) = template.end_date.as_deref() {
        if date > parse_date(end_date)? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// The time a template occupies, or `None` if its start time is unusable.
pub fn template_interval(
    template: &RecurringSessionTemplate,
    default_minutes: u32,
) -> Option<TimeInterval> {
    let start = parse_clock_time(&template.start_time)?;
    let length = template.session_length(default_minutes);
    TimeInterval::new(start, start.saturating_add(length).min(MINUTES_PER_DAY))
}

/// Where a logged session sits on the site's wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedSpan {
    pub date: NaiveDate,
    pub start_minutes: u32,
    /// Recorded end, capped at midnight; `None` when absent or not after the start.
    pub end_minutes: Option<u32>,
}

impl LoggedSpan {
    /// # Errors
    /// Returns `SlotError::InvalidDate` for an unparseable start or end timestamp.
    pub fn of(session: &LoggedSession, tz: Tz) -> Result<Self> {
        let start = Timestamp::from_str(&session.start_date_time)?.to_local(tz);
        let end_minutes = match session.end_date_time.as_deref() {
            Some(raw) => {
                let end = Timestamp::from_str(raw)?.to_local(tz);
                if end <= start {
                    None
                } else if end.date() > start.date() {
                    Some(MINUTES_PER_DAY)
                } else {
                    Some(minute_of_day(end.time()))
                }
            }
            None => None,
        };
        Ok(Self {
            date: start.date(),
            start_minutes: minute_of_day(start.time()),
            end_minutes,
        })
    }

    pub fn end_or(&self, default_minutes: u32) -> u32 {
        self.end_minutes
            .unwrap_or_else(|| {
                self.start_minutes
                    .saturating_add(default_minutes)
                    .min(MINUTES_PER_DAY)
            })
    }
}

/// The local wall-clock time a logged session occupies on `date`, if any.
///
/// # Errors
/// Returns `SlotError::InvalidDate` for an unparseable start or end timestamp.
pub fn logged_interval(
    session: &LoggedSession,
    date: NaiveDate,
    config: &EngineConfig,
) -> Result<Option<TimeInterval>> {
    let span = LoggedSpan::of(session, config.tz()?)?;
    if span.date != date {
        return Ok(None);
    }
    Ok(TimeInterval::new(
        span.start_minutes,
        span.end_or(config.default_session_minutes),
    ))
}

/// Collect every interval occupied at the site on `date`.
///
/// Records matching `exclusion` (a shared student and a start within the
/// configured tolerance) are skipped. The result is unmerged and unsorted.
///
/// # Errors
/// Returns `SlotError::InvalidDate` if any date or timestamp the resolver needs
/// cannot be parsed, and `SlotError::InvalidTimezone` for a bad configured zone.
pub fn resolve(
    date: NaiveDate,
    templates: &[RecurringSessionTemplate],
    logged_sessions: &[LoggedSession],
    exclusion: &ExclusionDescriptor,
    config: &EngineConfig,
) -> Result<Vec<TimeInterval>> {
    let tolerance = config.match_tolerance_minutes;
    let mut occupied = Vec::with_capacity(templates.len() + logged_sessions.len());

    for template in templates {
        if !template_occurs_on(template, date)? {
            continue;
        }
        let Some(interval) = template_interval(template, config.default_session_minutes) else {
            warn!(
                template_id = template.id.as_deref().unwrap_or("-"),
                start_time = %template.start_time,
                "skipping template with unparseable start time"
            );
            continue;
        };
        let students = template.student_ids.iter().map(String::as_str);
        if exclusion.matches(students, interval.start(), tolerance) {
            debug!(template_id = template.id.as_deref().unwrap_or("-"), "excluded template");
            continue;
        }
        occupied.push(interval);
    }

    for session in logged_sessions {
        let Some(interval) = logged_interval(session, date, config)? else {
            continue;
        };
        let students = std::iter::once(session.student_id.as_str());
        if exclusion.matches(students, interval.start(), tolerance) {
            debug!(session_id = session.id.as_deref().unwrap_or("-"), "excluded logged session");
            continue;
        }
        occupied.push(interval);
    }

    debug!(%date, occupied = occupied.len(), "resolved occupancy");
    Ok(occupied)
}
