//! Tests for the minute-of-day interval model: construction, merging, overlap,
//! and the 12-hour label format.

use slot_engine::interval::{format_minutes, merge, overlaps, parse_clock, parse_label, TimeInterval};

fn iv(start: u32, end: u32) -> TimeInterval {
    TimeInterval::new(start, end).unwrap()
}

// ── Construction ────────────────────────────────────────────────────────────

#[test]
fn new_rejects_empty_inverted_and_overlong_ranges() {
    assert!(TimeInterval::new(600, 600).is_none());
    assert!(TimeInterval::new(700, 600).is_none());
    assert!(TimeInterval::new(1400, 1441).is_none());
    assert!(TimeInterval::new(0, 1440).is_some());
}

#[test]
fn contains_is_half_open() {
    let session = iv(540, 570);
    assert!(session.contains(540));
    assert!(session.contains(569));
    assert!(!session.contains(570));
}

// ── Merge ───────────────────────────────────────────────────────────────────

#[test]
fn merge_empty_is_empty() {
    assert!(merge(&[]).is_empty());
}

#[test]
fn merge_sorts_disjoint_intervals() {
    let merged = merge(&[iv(780, 810), iv(540, 570)]);
    assert_eq!(merged, vec![iv(540, 570), iv(780, 810)]);
}

#[test]
fn merge_folds_overlapping_intervals() {
    // 9:00-10:30 and 10:00-11:30 become 9:00-11:30
    let merged = merge(&[iv(540, 630), iv(600, 690)]);
    assert_eq!(merged, vec![iv(540, 690)]);
}

#[test]
fn merge_folds_touching_intervals() {
    // No gap between 9:00-9:30 and 9:30-10:00.
    let merged = merge(&[iv(570, 600), iv(540, 570)]);
    assert_eq!(merged, vec![iv(540, 600)]);
}

#[test]
fn merge_absorbs_nested_intervals() {
    let merged = merge(&[iv(540, 720), iv(600, 630), iv(660, 700)]);
    assert_eq!(merged, vec![iv(540, 720)]);
}

#[test]
fn merge_keeps_one_minute_gaps() {
    let merged = merge(&[iv(540, 570), iv(571, 600)]);
    assert_eq!(merged.len(), 2);
}

// ── Overlap ─────────────────────────────────────────────────────────────────

#[test]
fn adjacent_intervals_do_not_overlap() {
    assert!(!overlaps(&iv(540, 570), &iv(570, 600)));
    assert!(!overlaps(&iv(570, 600), &iv(540, 570)));
}

#[test]
fn partial_and_nested_intervals_overlap() {
    assert!(overlaps(&iv(540, 600), &iv(570, 630)));
    assert!(overlaps(&iv(540, 720), &iv(600, 630)));
}

// ── Labels ──────────────────────────────────────────────────────────────────

#[test]
fn formats_noon_and_midnight() {
    assert_eq!(format_minutes(0), "12:00 AM");
    assert_eq!(format_minutes(720), "12:00 PM");
    assert_eq!(format_minutes(785), "1:05 PM");
    assert_eq!(format_minutes(1440), "12:00 AM");
}

#[test]
fn label_uses_twelve_hour_clock() {
    assert_eq!(iv(480, 540).label(), "8:00 AM - 9:00 AM");
    assert_eq!(iv(570, 1020).label(), "9:30 AM - 5:00 PM");
    assert_eq!(iv(700, 760).to_string(), "11:40 AM - 12:40 PM");
}

#[test]
fn parse_clock_rejects_garbage() {
    assert_eq!(parse_clock("9:05 AM"), Some(545));
    assert_eq!(parse_clock("12:30 AM"), Some(30));
    assert_eq!(parse_clock("13:00 PM"), None);
    assert_eq!(parse_clock("9:60 AM"), None);
    assert_eq!(parse_clock("9:00"), None);
    assert_eq!(parse_clock("9:00 XM"), None);
}

#[test]
fn label_reparses_to_the_same_interval() {
    for interval in [iv(480, 540), iv(715, 725), iv(0, 1440), iv(1380, 1440)] {
        assert_eq!(parse_label(&interval.label()), Some(interval));
    }
}

#[test]
fn parse_label_rejects_malformed_labels() {
    assert_eq!(parse_label("9:00 AM to 10:00 AM"), None);
    assert_eq!(parse_label("10:00 AM - 9:00 AM"), None);
}
