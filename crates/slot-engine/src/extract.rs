//! Turn a filled timeline into maximal free slots.
//!
//! A single left-to-right pass alternates between looking for the next
//! available minute (opening a free run) and the next scheduled minute
//! (closing it). Runs are closed intervals: a run interrupted at minute `m`
//! ends at `m - 1`, and a run still open at the end of the timeline ends at
//! its last minute. A run that only opens on the last minute is dropped.

use chrono::{DateTime, Duration, Utc};

use crate::slot::TimeSlot;
use crate::timeline::{Availability, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    SeekingFree,
    SeekingBusy { run_start: DateTime<Utc> },
}

/// Free slots in ascending start order, pairwise disjoint.
///
/// A fully scheduled timeline yields no slots, and neither does one whose
/// only free minute is its last.
pub fn extract_free_slots(timeline: &Timeline) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    let mut scan = Scan::SeekingFree;

    for (index, state) in timeline.states().iter().enumerate() {
        match (scan, state) {
            (Scan::SeekingFree, Availability::Available) => {
                scan = Scan::SeekingBusy {
                    run_start: timeline.minute_at(index),
                };
            }
            (Scan::SeekingBusy { run_start }, Availability::Scheduled) => {
                let run_end = timeline.minute_at(index) - Duration::minutes(1);
                slots.push(TimeSlot::from_calibrated(run_start, run_end));
                scan = Scan::SeekingFree;
            }
            _ => {}
        }
    }

    if let Scan::SeekingBusy { run_start } = scan {
        if run_start < timeline.last_minute() {
            slots.push(TimeSlot::from_calibrated(run_start, timeline.last_minute()));
        }
    }

    slots
}

/// The single slot spanning a timeline from its first to its last minute.
pub fn whole_window(timeline: &Timeline) -> TimeSlot {
    TimeSlot::from_calibrated(timeline.start(), timeline.last_minute())
}
