//! Tests for per-minute timeline construction, clipping, and marking.

use chrono::{DateTime, Duration, TimeZone, Utc};
use slot_engine::{clip_to_window, Availability, SlotError, Timeline, TimeSlot, MAX_TIMELINE_MINUTES};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
}

fn slot(from: (u32, u32), to: (u32, u32)) -> TimeSlot {
    TimeSlot::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
}

// ── Construction ────────────────────────────────────────────────────────────

#[test]
fn build_covers_window_end_exclusive() {
    let timeline = Timeline::build(at(9, 0), at(10, 0)).unwrap();

    assert_eq!(timeline.len(), 60);
    assert_eq!(timeline.start(), at(9, 0));
    assert_eq!(timeline.last_minute(), at(9, 59));
    assert_eq!(timeline.end(), at(10, 0));
    assert!(timeline.iter().all(|(_, s)| s == Availability::Available));
}

#[test]
fn build_keys_are_consecutive_minutes() {
    let timeline = Timeline::build(at(9, 0), at(9, 30)).unwrap();
    let keys: Vec<_> = timeline.iter().map(|(k, _)| k).collect();

    for pair in keys.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::minutes(1));
    }
}

#[test]
fn build_calibrates_bounds() {
    let timeline =
        Timeline::build(at(9, 0) + Duration::seconds(50), at(9, 10) + Duration::seconds(5)).unwrap();
    assert_eq!(timeline.start(), at(9, 0));
    assert_eq!(timeline.len(), 10);
}

#[test]
fn build_rejects_empty_and_inverted_windows() {
    assert!(Timeline::build(at(9, 0), at(9, 0)).is_err());
    assert!(Timeline::build(at(10, 0), at(9, 0)).is_err());
    // Less than a minute apart collapses to an empty window.
    assert!(Timeline::build(at(9, 0), at(9, 0) + Duration::seconds(30)).is_err());
}

#[test]
fn build_accepts_up_to_the_size_limit() {
    let start = at(0, 0);
    let timeline = Timeline::build(start, start + Duration::minutes(MAX_TIMELINE_MINUTES)).unwrap();
    assert_eq!(timeline.len() as i64, MAX_TIMELINE_MINUTES);

    assert!(matches!(
        Timeline::build(start, start + Duration::minutes(MAX_TIMELINE_MINUTES + 1)).unwrap_err(),
        SlotError::InvalidArgument { param: "window_end", .. }
    ));
}

#[test]
fn build_rejects_windows_spanning_the_representable_range() {
    let start = DateTime::<Utc>::MIN_UTC + Duration::minutes(1);
    let end = DateTime::<Utc>::MAX_UTC - Duration::minutes(1);
    assert!(Timeline::build(start, end).is_err());
}

// ── Clipping ────────────────────────────────────────────────────────────────

#[test]
fn clip_drops_intervals_outside_the_window() {
    assert!(clip_to_window(&slot((7, 0), (8, 0)), at(9, 0), at(17, 0)).is_none());
    assert!(clip_to_window(&slot((18, 0), (19, 0)), at(9, 0), at(17, 0)).is_none());
    // Touching a bound is still outside.
    assert!(clip_to_window(&slot((8, 0), (9, 0)), at(9, 0), at(17, 0)).is_none());
    assert!(clip_to_window(&slot((17, 0), (18, 0)), at(9, 0), at(17, 0)).is_none());
}

#[test]
fn clip_clamps_partial_overlaps() {
    let clipped = clip_to_window(&slot((8, 0), (9, 30)), at(9, 0), at(17, 0)).unwrap();
    assert_eq!(clipped, slot((9, 0), (9, 30)));

    let clipped = clip_to_window(&slot((16, 30), (18, 0)), at(9, 0), at(17, 0)).unwrap();
    assert_eq!(clipped, slot((16, 30), (17, 0)));

    let clipped = clip_to_window(&slot((8, 0), (18, 0)), at(9, 0), at(17, 0)).unwrap();
    assert_eq!(clipped, slot((9, 0), (17, 0)));
}

#[test]
fn clip_keeps_contained_intervals() {
    let busy = slot((10, 0), (11, 0));
    assert_eq!(clip_to_window(&busy, at(9, 0), at(17, 0)), Some(busy));
}

// ── Marking ─────────────────────────────────────────────────────────────────

#[test]
fn mark_scheduled_is_end_exclusive() {
    let mut timeline = Timeline::build(at(9, 0), at(10, 0)).unwrap();
    let newly = timeline.mark_scheduled(&slot((9, 10), (9, 20)));

    assert_eq!(newly, 10);
    assert_eq!(timeline.get(at(9, 9)), Some(Availability::Available));
    assert_eq!(timeline.get(at(9, 10)), Some(Availability::Scheduled));
    assert_eq!(timeline.get(at(9, 19)), Some(Availability::Scheduled));
    assert_eq!(timeline.get(at(9, 20)), Some(Availability::Available));
}

#[test]
fn mark_scheduled_never_reverts_and_counts_only_new_minutes() {
    let mut timeline = Timeline::build(at(9, 0), at(10, 0)).unwrap();
    assert_eq!(timeline.mark_scheduled(&slot((9, 0), (9, 30))), 30);
    assert_eq!(timeline.mark_scheduled(&slot((9, 15), (9, 45))), 15);
    assert_eq!(timeline.mark_scheduled(&slot((9, 0), (9, 45))), 0);
    assert_eq!(timeline.scheduled_minutes(), 45);
}

#[test]
fn mark_scheduled_ignores_minutes_outside_the_timeline() {
    let mut timeline = Timeline::build(at(9, 0), at(10, 0)).unwrap();
    assert_eq!(timeline.mark_scheduled(&slot((8, 0), (9, 5))), 5);
    assert_eq!(timeline.mark_scheduled(&slot((9, 55), (11, 0))), 5);
    assert_eq!(timeline.mark_scheduled(&slot((11, 0), (12, 0))), 0);
    assert_eq!(timeline.get(at(8, 30)), None);
}

#[test]
fn merge_ors_scheduled_minutes() {
    let mut a = Timeline::build(at(9, 0), at(10, 0)).unwrap();
    let mut b = a.clone();
    a.mark_scheduled(&slot((9, 0), (9, 10)));
    b.mark_scheduled(&slot((9, 5), (9, 20)));

    a.merge(&b).unwrap();
    assert_eq!(a.scheduled_minutes(), 20);
    assert!(a.has_available());
}

#[test]
fn merge_rejects_mismatched_ranges() {
    let mut a = Timeline::build(at(9, 0), at(10, 0)).unwrap();
    let b = Timeline::build(at(9, 0), at(11, 0)).unwrap();
    assert!(a.merge(&b).is_err());
}
