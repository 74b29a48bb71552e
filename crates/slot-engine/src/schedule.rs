//! Site scheduling records as they come out of the data-access layer.
//!
//! Records keep the loosely-typed shape of the stored documents (dates and times
//! as strings, duration as number-or-string) so that a single bad field on one
//! template can fall back to a default instead of rejecting the whole site.
//! Normalisation happens in [`crate::occupancy`].

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::dates::{self, parse_clock_time};
use crate::error::{Result, SlotError};
use crate::interval::MINUTES_PER_DAY;

/// How a recurring template repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrencePattern {
    /// Every week on the weekdays listed in `dayOfWeek`.
    Weekly,
    /// Every day.
    Daily,
    /// Only on the dates listed in `specificDates`.
    #[serde(alias = "specific_dates", alias = "specificDates")]
    SpecificDates,
    /// A one-time session on `startDate`.
    #[default]
    None,
}

/// A standing therapy slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecurringSessionTemplate {
    pub id: Option<String>,
    pub student_ids: Vec<String>,
    /// `HH:mm`. A missing or non-string value reads as empty and the template
    /// is skipped.
    #[serde(deserialize_with = "lenient_text")]
    pub start_time: String,
    /// `HH:mm`; takes precedence over `duration` when present and valid.
    #[serde(deserialize_with = "lenient_optional_text")]
    pub end_time: Option<String>,
    /// Minutes. Stored documents carry this as either a number or a numeric string.
    #[serde(deserialize_with = "lenient_minutes")]
    pub duration: Option<u32>,
    pub recurrence_pattern: RecurrencePattern,
    /// 0 = Sunday .. 6 = Saturday. Only consulted for weekly templates.
    pub day_of_week: Vec<u8>,
    pub specific_dates: Vec<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub active: bool,
    pub cancelled_dates: Vec<String>,
}

impl Default for RecurringSessionTemplate {
    fn default() -> Self {
        Self {
            id: None,
            student_ids: Vec::new(),
            start_time: String::new(),
            end_time: None,
            duration: None,
            recurrence_pattern: RecurrencePattern::default(),
            day_of_week: Vec::new(),
            specific_dates: Vec::new(),
            start_date: String::new(),
            end_date: None,
            active: true,
            cancelled_dates: Vec::new(),
        }
    }
}

impl RecurringSessionTemplate {
    /// Session length in minutes: `endTime - startTime` if both parse and are
    /// ordered, else `duration` if positive, else `default_minutes`.
    ///
    /// Never longer than a day.
    pub fn session_length(&self, default_minutes: u32) -> u32 {
        let start = parse_clock_time(&self.start_time);
        let end = self.end_time.as_deref().and_then(parse_clock_time);
        let length = match (start, end) {
            (Some(s), Some(e)) if e > s => e - s,
            _ => self.duration.filter(|d| *d > 0).unwrap_or(default_minutes),
        };
        length.min(MINUTES_PER_DAY)
    }
}

/// A session that actually took place (or was missed).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggedSession {
    pub id: Option<String>,
    pub student_id: String,
    /// ISO 8601 timestamp.
    pub start_date_time: String,
    /// ISO 8601 timestamp; the session is assumed to run the default length when absent.
    pub end_date_time: Option<String>,
    pub missed: bool,
}

/// School operating hours in whole 24-hour clock hours.
///
/// A missing field takes its value from the 8–17 default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatingHours {
    #[serde(deserialize_with = "whole_hour")]
    pub start_hour: u32,
    #[serde(deserialize_with = "whole_hour")]
    pub end_hour: u32,
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 17,
        }
    }
}

impl OperatingHours {
    pub fn is_valid(&self) -> bool {
        self.start_hour < self.end_hour && self.end_hour <= 24
    }

    /// `self` if it describes a real window, otherwise `fallback`.
    pub fn or_fallback(self, fallback: OperatingHours) -> OperatingHours {
        if self.is_valid() {
            self
        } else {
            tracing::warn!(
                start_hour = self.start_hour,
                end_hour = self.end_hour,
                "invalid operating hours, using fallback"
            );
            fallback
        }
    }

    pub fn start_minute(&self) -> u32 {
        self.start_hour.saturating_mul(60).min(MINUTES_PER_DAY)
    }

    pub fn end_minute(&self) -> u32 {
        self.end_hour.saturating_mul(60).min(MINUTES_PER_DAY)
    }
}

/// The session being cancelled or rescheduled.
///
/// Its own slot must not count as occupied, otherwise that slot could never be
/// offered back as a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExclusionDescriptor {
    pub student_ids: Vec<String>,
    pub start_minutes: u32,
    pub end_minutes: Option<u32>,
    /// Calendar date of the vacated session, when known.
    pub date: Option<chrono::NaiveDate>,
}

impl ExclusionDescriptor {
    /// An exclusion that matches nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from the string forms used by callers (`HH:mm`, `yyyy-MM-dd`).
    ///
    /// # Errors
    /// `SlotError::InvalidTime` for an unparseable start or end time,
    /// `SlotError::InvalidDate` for an unparseable date.
    pub fn parse(
        student_ids: Vec<String>,
        start_time: &str,
        end_time: Option<&str>,
        date: Option<&str>,
    ) -> Result<Self> {
        let start_minutes = parse_clock_time(start_time)
            .ok_or_else(|| SlotError::InvalidTime(start_time.to_string()))?;
        let end_minutes = end_time
            .map(|t| parse_clock_time(t).ok_or_else(|| SlotError::InvalidTime(t.to_string())))
            .transpose()?;
        let date = date.map(dates::parse_date).transpose()?;
        Ok(Self {
            student_ids,
            start_minutes,
            end_minutes,
            date,
        })
    }

    /// End of the vacated session, defaulting to `default_minutes` after its start.
    pub fn end_or(&self, default_minutes: u32) -> u32 {
        self.end_minutes
            .unwrap_or(self.start_minutes.saturating_add(default_minutes))
            .min(MINUTES_PER_DAY)
    }

    /// True when a session with these students starting at `start_minutes` is
    /// the vacated session: at least one shared student and a start time within
    /// `tolerance` minutes (inclusive).
    pub fn matches<'a, I>(&self, student_ids: I, start_minutes: u32, tolerance: u32) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        start_minutes.abs_diff(self.start_minutes) <= tolerance
            && student_ids
                .into_iter()
                .any(|id| self.student_ids.iter().any(|own| own == id))
    }
}

/// Read-only access to a site's scheduling data.
///
/// Implemented by the surrounding application's storage layer. The engine calls
/// each method at most once per query and never writes.
pub trait ScheduleSource {
    fn recurring_templates(&self, site: &str) -> Result<Vec<RecurringSessionTemplate>>;

    fn logged_sessions(&self, site: &str) -> Result<Vec<LoggedSession>>;

    /// `None` when the site has no hours configured.
    fn operating_hours(&self, site: &str) -> Result<Option<OperatingHours>>;
}

/// Everything the engine needs about one site.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSchedule {
    pub templates: Vec<RecurringSessionTemplate>,
    pub logged_sessions: Vec<LoggedSession>,
    /// Unreadable hours read as `None`, so the engine's fallback applies.
    #[serde(deserialize_with = "lenient_hours")]
    pub operating_hours: Option<OperatingHours>,
}

impl SiteSchedule {
    /// Pull a site's data through the collaborator interface.
    pub fn fetch<S: ScheduleSource + ?Sized>(source: &S, site: &str) -> Result<Self> {
        Ok(Self {
            templates: source.recurring_templates(site)?,
            logged_sessions: source.logged_sessions(site)?,
            operating_hours: source.operating_hours(site)?,
        })
    }
}

/// An in-memory [`ScheduleSource`] keyed by site name, loadable from JSON.
///
/// ```json
/// { "sites": { "Lincoln Elementary": { "templates": [], "loggedSessions": [] } } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteSnapshot {
    #[serde(default)]
    pub sites: BTreeMap<String, SiteSchedule>,
}

impl SiteSnapshot {
    /// # Errors
    /// Returns `SlotError::Source` if the JSON does not describe a snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SlotError::Source(format!("invalid site snapshot JSON: {}", e)))
    }

    pub fn site(&self, site: &str) -> Result<&SiteSchedule> {
        self.sites
            .get(site)
            .ok_or_else(|| SlotError::UnknownSite(site.to_string()))
    }
}

impl ScheduleSource for SiteSnapshot {
    fn recurring_templates(&self, site: &str) -> Result<Vec<RecurringSessionTemplate>> {
        Ok(self.site(site)?.templates.clone())
    }

    fn logged_sessions(&self, site: &str) -> Result<Vec<LoggedSession>> {
        Ok(self.site(site)?.logged_sessions.clone())
    }

    fn operating_hours(&self, site: &str) -> Result<Option<OperatingHours>> {
        Ok(self.site(site)?.operating_hours)
    }
}

/// A non-negative whole number stored as a JSON number or a numeric string.
fn whole_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Accept a duration stored as a JSON number, a numeric string, or garbage.
///
/// Anything that is not a positive whole number of minutes becomes `None`.
/// Lengths past a day are capped at [`MINUTES_PER_DAY`].
fn lenient_minutes<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(whole_number)
        .filter(|m| *m > 0)
        .map(|m| m.min(u64::from(MINUTES_PER_DAY)) as u32))
}

/// A string field that reads as empty when null or not a string.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn whole_hour<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    whole_number(&value)
        .and_then(|h| u32::try_from(h).ok())
        .ok_or_else(|| D::Error::custom(format!("invalid hour: {}", value)))
}

/// Operating hours that cannot be read are treated as not configured.
fn lenient_hours<'de, D>(deserializer: D) -> std::result::Result<Option<OperatingHours>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(hours) => Ok(Some(hours)),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable operating hours, using fallback");
            Ok(None)
        }
    }
}
