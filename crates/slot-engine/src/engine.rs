//! The open-slot pipeline: resolve occupancy, compute gaps, verify.

use tracing::debug;

use crate::availability::{compute_open_slots, earliest_start};
use crate::config::EngineConfig;
use crate::dates::{parse_date, Timestamp};
use crate::error::{Result, SlotError};
use crate::interval::{merge, TimeInterval, MINUTES_PER_DAY};
use crate::occupancy::resolve;
use crate::schedule::{ExclusionDescriptor, OperatingHours, ScheduleSource, SiteSchedule};
use crate::verify::{verify, OpenSlot};

/// What the caller is looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    /// `yyyy-MM-dd` or an ISO 8601 timestamp.
    pub target_date: String,
    pub duration_minutes: u32,
    pub exclusion: ExclusionDescriptor,
}

/// Stateless open-slot finder. Construct once and share freely.
#[derive(Debug, Clone, Default)]
pub struct SlotEngine {
    config: EngineConfig,
}

impl SlotEngine {
    /// # Errors
    /// Returns `SlotError::InvalidConfig` for an out-of-range tolerance or
    /// default length, `SlotError::InvalidTimezone` for an unknown timezone.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        config.tz()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Open windows at `site` on the requested date, sorted by start time.
    ///
    /// Fetches the site's templates, logged sessions, and operating hours from
    /// `source`, then runs [`SlotEngine::compute`].
    pub fn find_open_slots<S: ScheduleSource + ?Sized>(
        &self,
        source: &S,
        site: &str,
        request: &SlotRequest,
        now: &Timestamp,
    ) -> Result<Vec<OpenSlot>> {
        let schedule = SiteSchedule::fetch(source, site)?;
        debug!(
            site,
            templates = schedule.templates.len(),
            logged_sessions = schedule.logged_sessions.len(),
            "fetched site schedule"
        );
        self.compute(&schedule, request, now)
    }

    /// Like [`SlotEngine::find_open_slots`] but returns only the formatted windows.
    pub fn find_open_slot_labels<S: ScheduleSource + ?Sized>(
        &self,
        source: &S,
        site: &str,
        request: &SlotRequest,
        now: &Timestamp,
    ) -> Result<Vec<String>> {
        Ok(self
            .find_open_slots(source, site, request, now)?
            .into_iter()
            .map(|slot| slot.label)
            .collect())
    }

    /// Run the pipeline over already-fetched data.
    ///
    /// # Errors
    /// - `SlotError::InvalidDuration` if the duration is 0 or longer than a day.
    /// - `SlotError::InvalidDate` if the target date or any record's date is unparseable.
    pub fn compute(
        &self,
        schedule: &SiteSchedule,
        request: &SlotRequest,
        now: &Timestamp,
    ) -> Result<Vec<OpenSlot>> {
        let duration = request.duration_minutes;
        if duration == 0 || duration > MINUTES_PER_DAY {
            return Err(SlotError::InvalidDuration(duration));
        }

        let date = parse_date(&request.target_date)?;
        let hours = self.hours_for(schedule);
        let occupied = resolve(
            date,
            &schedule.templates,
            &schedule.logged_sessions,
            &request.exclusion,
            &self.config,
        )?;
        let merged = merge(&occupied);

        let now_local = now.to_local(self.config.tz()?);
        let earliest = earliest_start(
            date,
            now_local,
            &request.exclusion,
            &merged,
            hours,
            &self.config,
        );

        let candidates = compute_open_slots(&occupied, duration, hours, earliest);
        let slots = verify(&candidates, &merged, earliest, duration);
        debug!(
            %date,
            candidates = candidates.len(),
            verified = slots.len(),
            "open slot search complete"
        );
        Ok(slots)
    }

    /// Merged occupied intervals at the site on `date`, after exclusion.
    pub fn occupied(
        &self,
        schedule: &SiteSchedule,
        date: &str,
        exclusion: &ExclusionDescriptor,
    ) -> Result<Vec<TimeInterval>> {
        let date = parse_date(date)?;
        let occupied = resolve(
            date,
            &schedule.templates,
            &schedule.logged_sessions,
            exclusion,
            &self.config,
        )?;
        Ok(merge(&occupied))
    }

    /// The site's operating hours, or the configured default.
    pub fn hours_for(&self, schedule: &SiteSchedule) -> OperatingHours {
        let fallback = self
            .config
            .default_hours
            .or_fallback(OperatingHours::default());
        schedule
            .operating_hours
            .map(|h| h.or_fallback(fallback))
            .unwrap_or(fallback)
    }
}
