//! # slot-engine
//!
//! Deterministic open-slot computation for rescheduling therapy sessions.
//!
//! Given a site's recurring session templates and logged sessions, the engine
//! works out which stretches of a school day are still free for a replacement
//! session of a given length. The session being cancelled or rescheduled never
//! blocks its own slot, school operating hours are respected, and when the
//! target day is today nothing before "now" is offered. "Now" is always passed
//! in, so identical inputs give identical output.
//!
//! ## Modules
//!
//! - [`interval`] — minute-of-day intervals, merging, 12-hour labels
//! - [`dates`] — dual-format date parsing and site-local wall-clock conversion
//! - [`schedule`] — template/session records, operating hours, the data-source trait
//! - [`occupancy`] — records → occupied intervals for one date
//! - [`availability`] — occupied intervals → open gaps, earliest-start rule
//! - [`verify`] — final re-check of every offered slot
//! - [`engine`] — the full pipeline behind one call
//! - [`adapters`] — no-show and cancellation entry points
//! - [`config`] — tolerances and defaults
//! - [`error`] — Error types

pub mod adapters;
pub mod availability;
pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod interval;
pub mod occupancy;
pub mod schedule;
pub mod verify;

pub use adapters::{cancellation_options, reschedule_after_no_show};
pub use availability::{compute_open_slots, earliest_start};
pub use config::EngineConfig;
pub use dates::Timestamp;
pub use engine::{SlotEngine, SlotRequest};
pub use error::SlotError;
pub use interval::{merge, overlaps, TimeInterval};
pub use occupancy::resolve;
pub use schedule::{
    ExclusionDescriptor, LoggedSession, OperatingHours, RecurrencePattern,
    RecurringSessionTemplate, ScheduleSource, SiteSchedule, SiteSnapshot,
};
pub use verify::{verify, OpenSlot};
