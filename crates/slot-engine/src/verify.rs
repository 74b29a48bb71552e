//! Final re-check of candidate slots before they reach the caller.
//!
//! Each candidate is formatted, the label is parsed back into minutes, and the
//! parsed range is checked against the earliest allowed start, the required
//! duration, and the merged occupancy. Candidates that fail are dropped.

use serde::Serialize;
use tracing::debug;

use crate::interval::{merge, overlaps, parse_label, TimeInterval};

/// A verified open window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenSlot {
    #[serde(flatten)]
    pub interval: TimeInterval,
    /// `"h:mm AM - h:mm PM"`
    pub label: String,
}

/// Keep only candidates whose formatted form still describes a valid offer.
///
/// A candidate survives when its label parses back to a range that starts at or
/// after `earliest_start`, lasts at least `required_minutes`, and overlaps none
/// of `occupied` (merged here, so raw resolver output is fine).
pub fn verify(
    candidates: &[TimeInterval],
    occupied: &[TimeInterval],
    earliest_start: u32,
    required_minutes: u32,
) -> Vec<OpenSlot> {
    let merged = merge(occupied);

    candidates
        .iter()
        .filter_map(|candidate| {
            let label = candidate.label();
            let Some(parsed) = parse_label(&label) else {
                debug!(%label, "dropping slot: label does not parse");
                return None;
            };
            if parsed.start() < earliest_start {
                debug!(%label, earliest_start, "dropping slot: starts too early");
                return None;
            }
            if parsed.duration_minutes() < required_minutes {
                debug!(%label, required_minutes, "dropping slot: too short");
                return None;
            }
            if merged.iter().any(|busy| overlaps(busy, &parsed)) {
                debug!(%label, "dropping slot: overlaps occupied time");
                return None;
            }
            Some(OpenSlot {
                interval: parsed,
                label,
            })
        })
        .collect()
}
