//! The per-minute availability timeline built fresh for each query.
//!
//! A timeline covers `[start, end)` with one entry per minute. Entries start
//! out [`Availability::Available`] and only ever move to
//! [`Availability::Scheduled`]; nothing flips a minute back. That one-way
//! transition makes marking an idempotent OR over "is anyone busy at this
//! minute", so the order in which busy intervals are applied never matters.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::slot::TimeSlot;
use crate::time::{calibrate_to_minutes, minutes_between};

/// Longest window a timeline will cover, ten years of minutes.
pub const MAX_TIMELINE_MINUTES: i64 = 10 * 366 * 24 * 60;

/// State of a single minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    Available,
    Scheduled,
}

/// Ordered, gap-free per-minute availability over `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    start: DateTime<Utc>,
    states: Vec<Availability>,
}

impl Timeline {
    /// One `Available` entry per minute in `[window_start, window_end)`.
    ///
    /// Both bounds are calibrated first. An empty or inverted window is
    /// rejected, as is one longer than [`MAX_TIMELINE_MINUTES`].
    pub fn build(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Result<Self> {
        let start = calibrate_to_minutes(window_start);
        let end = calibrate_to_minutes(window_end);
        if end <= start {
            return Err(SlotError::invalid(
                "window_end",
                format!("timeline end {end} must be after start {start}"),
            ));
        }

        let span = minutes_between(start, end);
        if span > MAX_TIMELINE_MINUTES {
            return Err(SlotError::invalid(
                "window_end",
                format!("timeline spans {span} minutes, more than the limit of {MAX_TIMELINE_MINUTES}"),
            ));
        }
        let minutes = usize::try_from(span)
            .map_err(|_| SlotError::invalid("window_end", "timeline too large"))?;

        Ok(Timeline {
            start,
            states: vec![Availability::Available; minutes],
        })
    }

    /// First minute covered.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end of the covered range.
    pub fn end(&self) -> DateTime<Utc> {
        self.minute_at(self.states.len())
    }

    /// Last minute covered (the final key of the timeline).
    pub fn last_minute(&self) -> DateTime<Utc> {
        self.minute_at(self.states.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false` for a timeline produced by [`Timeline::build`].
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State at `minute`, or `None` outside the covered range.
    pub fn get(&self, minute: DateTime<Utc>) -> Option<Availability> {
        self.index_of(minute).map(|i| self.states[i])
    }

    /// Entries in ascending minute order.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, Availability)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(move |(i, state)| (self.minute_at(i), *state))
    }

    pub fn has_available(&self) -> bool {
        self.states.contains(&Availability::Available)
    }

    pub fn scheduled_minutes(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == Availability::Scheduled)
            .count()
    }

    /// Mark every covered minute in `[busy.start, busy.end)` as scheduled.
    ///
    /// Minutes outside the timeline are ignored. Returns how many minutes
    /// moved from `Available` to `Scheduled`.
    pub fn mark_scheduled(&mut self, busy: &TimeSlot) -> usize {
        let (lo, hi) = self.index_range(busy.start(), busy.end());
        let mut newly = 0;
        for state in &mut self.states[lo..hi] {
            if *state == Availability::Available {
                *state = Availability::Scheduled;
                newly += 1;
            }
        }
        newly
    }

    /// OR another timeline over the same range into this one.
    pub fn merge(&mut self, other: &Timeline) -> Result<()> {
        if self.start != other.start || self.states.len() != other.states.len() {
            return Err(SlotError::invalid(
                "other",
                "cannot merge timelines covering different ranges",
            ));
        }
        for (mine, theirs) in self.states.iter_mut().zip(&other.states) {
            if *theirs == Availability::Scheduled {
                *mine = Availability::Scheduled;
            }
        }
        Ok(())
    }

    pub(crate) fn states(&self) -> &[Availability] {
        &self.states
    }

    pub(crate) fn minute_at(&self, index: usize) -> DateTime<Utc> {
        self.start + Duration::minutes(index as i64)
    }

    fn index_of(&self, minute: DateTime<Utc>) -> Option<usize> {
        let offset = minutes_between(self.start, calibrate_to_minutes(minute));
        usize::try_from(offset)
            .ok()
            .filter(|i| *i < self.states.len())
    }

    /// Indices covering `[from, to)`, clamped to the timeline.
    fn index_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> (usize, usize) {
        let len = self.states.len() as i64;
        let lo = minutes_between(self.start, from).clamp(0, len);
        let hi = minutes_between(self.start, to).clamp(0, len);
        (lo as usize, hi.max(lo) as usize)
    }
}

/// Clamp a busy interval to `[window_start, window_end)`.
///
/// Returns `None` when the interval lies entirely outside the window, so a
/// meeting partially overlapping the window only blanks out the overlap.
pub fn clip_to_window(
    busy: &TimeSlot,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Option<TimeSlot> {
    if busy.end() <= window_start || busy.start() >= window_end {
        return None;
    }
    Some(TimeSlot::from_calibrated(
        busy.start().max(window_start),
        busy.end().min(window_end),
    ))
}
