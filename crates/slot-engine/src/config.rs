//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object (`{}`) is a complete
//! configuration.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::MINUTES_PER_DAY;
use crate::schedule::OperatingHours;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// How far apart (in minutes, inclusive) two start times may be and still
    /// refer to the same session. Also how close "now" may be to an upcoming
    /// session before it counts as already under way.
    pub match_tolerance_minutes: u32,
    /// Session length used when a record does not say how long it runs.
    pub default_session_minutes: u32,
    /// Hours used for sites with none configured, or with invalid ones.
    pub default_hours: OperatingHours,
    /// IANA timezone of the site's wall clock.
    pub timezone: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_tolerance_minutes: 5,
            default_session_minutes: 30,
            default_hours: OperatingHours::default(),
            timezone: "UTC".to_string(),
        }
    }
}

impl EngineConfig {
    /// # Errors
    /// Returns `SlotError::InvalidConfig` if the JSON does not describe a
    /// configuration or describes one that [`EngineConfig::validate`] rejects.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SlotError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the tolerance and default session length fit within a day.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidConfig` naming the first field out of range.
    pub fn validate(&self) -> Result<()> {
        if self.match_tolerance_minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidConfig(format!(
                "matchToleranceMinutes must be at most {}, got {}",
                MINUTES_PER_DAY, self.match_tolerance_minutes
            )));
        }
        if self.default_session_minutes == 0 || self.default_session_minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidConfig(format!(
                "defaultSessionMinutes must be between 1 and {}, got {}",
                MINUTES_PER_DAY, self.default_session_minutes
            )));
        }
        Ok(())
    }

    /// The configured timezone.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTimezone` if `timezone` is not a valid IANA identifier.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(self.timezone.clone()))
    }
}
