//! The closed, minute-calibrated time interval used for meetings, windows,
//! and free slots alike.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::time::{calibrate_to_minutes, is_sentinel, minutes_between};

/// An immutable closed interval `[start, end]` at whole-minute resolution.
///
/// `start == end` is allowed and denotes a zero-duration slot. Deserialization
/// goes through [`TimeSlot::new`], so a decoded slot upholds the same
/// invariants as a constructed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot")]
pub struct TimeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawTimeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = SlotError;

    fn try_from(raw: RawTimeSlot) -> Result<Self> {
        TimeSlot::new(raw.start, raw.end)
    }
}

impl TimeSlot {
    /// Create a slot, calibrating both ends to whole minutes.
    ///
    /// Fails when either end is a sentinel or when `start > end` after
    /// calibration.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if is_sentinel(start) {
            return Err(SlotError::invalid("start", "invalid TimeSlot start time"));
        }
        if is_sentinel(end) {
            return Err(SlotError::invalid("end", "invalid TimeSlot end time"));
        }

        let start = calibrate_to_minutes(start);
        let end = calibrate_to_minutes(end);
        if start > end {
            return Err(SlotError::invalid(
                "end",
                format!("TimeSlot end {end} is before start {start}"),
            ));
        }

        Ok(TimeSlot { start, end })
    }

    /// Build from bounds that are already calibrated and ordered.
    pub(crate) fn from_calibrated(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end, "slot bounds out of order");
        debug_assert_eq!(start, calibrate_to_minutes(start));
        debug_assert_eq!(end, calibrate_to_minutes(end));
        TimeSlot { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Usable minutes in the slot.
    ///
    /// Both ends are inclusive, so a non-degenerate slot counts its last
    /// minute: `[09:00, 09:29]` is 30 minutes. A degenerate slot is 0.
    pub fn duration(&self) -> i64 {
        if self.is_degenerate() {
            0
        } else {
            self.minutes_between() + 1
        }
    }

    /// Raw `end - start` in minutes, without the closed-interval adjustment.
    pub fn minutes_between(&self) -> i64 {
        minutes_between(self.start, self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Clamp this slot onto `[lower, upper]`.
    ///
    /// A slot straddling a bound is cut at that bound; a slot lying wholly
    /// outside the range yields `None`.
    pub fn map_to_range(&self, lower: DateTime<Utc>, upper: DateTime<Utc>) -> Option<TimeSlot> {
        if self.end < lower || self.start > upper {
            return None;
        }
        Some(TimeSlot::from_calibrated(
            self.start.max(lower),
            self.end.min(upper),
        ))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({} min)",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M"),
            self.duration()
        )
    }
}
