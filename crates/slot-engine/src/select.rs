//! Choosing one slot out of many: tightest fit, optionally within a search range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::slot::TimeSlot;
use crate::time::{calibrate_to_minutes, is_sentinel, minutes_between};

/// Pick the smallest slot whose duration is at least `duration`, breaking
/// ties by earliest start.
///
/// Preferring the tightest gap over the earliest one keeps larger gaps intact
/// for longer meetings.
pub fn tightest_fit<I>(slots: I, duration: i64) -> Option<TimeSlot>
where
    I: IntoIterator<Item = TimeSlot>,
{
    slots
        .into_iter()
        .filter(|slot| slot.duration() >= duration)
        .min_by_key(|slot| (slot.duration(), slot.start()))
}

/// Bounds for a slot search. An absent `end` means "until the calendar ends".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRange {
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl SearchRange {
    /// Open-ended search starting at `start`.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        SearchRange { start, end: None }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        SearchRange {
            start,
            end: Some(end),
        }
    }

    /// Check the range and requested duration before any computation.
    pub fn validate(&self, duration: i64, now: DateTime<Utc>) -> Result<()> {
        if is_sentinel(self.start) {
            return Err(SlotError::invalid("search.start", "invalid search start time"));
        }
        validate_duration(duration)?;

        let Some(end) = self.end else {
            return Ok(());
        };
        let start = calibrate_to_minutes(self.start);
        let end = calibrate_to_minutes(end);
        if end <= start {
            return Err(SlotError::invalid(
                "search.end",
                "search range upper limit must be after the lower limit",
            ));
        }
        if duration > minutes_between(start, end) {
            return Err(SlotError::invalid(
                "duration",
                format!(
                    "meeting duration {duration} min is longer than the {} min search range",
                    minutes_between(start, end)
                ),
            ));
        }
        if end <= calibrate_to_minutes(now) {
            return Err(SlotError::invalid(
                "search.end",
                "search range upper limit must be after the current time",
            ));
        }
        Ok(())
    }
}

impl From<TimeSlot> for SearchRange {
    fn from(slot: TimeSlot) -> Self {
        SearchRange::between(slot.start(), slot.end())
    }
}

pub(crate) fn validate_duration(duration: i64) -> Result<()> {
    if duration <= 0 {
        return Err(SlotError::invalid(
            "duration",
            "meeting duration must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
    }

    fn slot(from: (u32, u32), to: (u32, u32)) -> TimeSlot {
        TimeSlot::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
    }

    #[test]
    fn picks_smallest_sufficient_slot() {
        // Durations 10, 60, 120.
        let slots = vec![
            slot((8, 0), (8, 9)),
            slot((10, 0), (10, 59)),
            slot((12, 0), (13, 59)),
        ];
        let chosen = tightest_fit(slots, 15).unwrap();
        assert_eq!(chosen.duration(), 60);
        assert_eq!(chosen.start(), at(10, 0));
    }

    #[test]
    fn equal_durations_prefer_earliest_start() {
        let slots = vec![slot((14, 0), (14, 29)), slot((9, 0), (9, 29))];
        assert_eq!(tightest_fit(slots, 30).unwrap().start(), at(9, 0));
    }

    #[test]
    fn nothing_big_enough_yields_none() {
        let slots = vec![slot((9, 0), (9, 9))];
        assert!(tightest_fit(slots, 11).is_none());
    }

    #[test]
    fn validation_rejects_bad_ranges() {
        let now = at(8, 0);
        assert!(SearchRange::starting_at(DateTime::<Utc>::MIN_UTC)
            .validate(10, now)
            .is_err());
        assert!(SearchRange::starting_at(at(9, 0)).validate(0, now).is_err());
        assert!(SearchRange::between(at(9, 0), at(9, 0)).validate(10, now).is_err());
        assert!(SearchRange::between(at(9, 0), at(9, 10)).validate(11, now).is_err());
        assert!(SearchRange::between(at(6, 0), at(7, 0)).validate(10, now).is_err());
        assert!(SearchRange::between(at(9, 0), at(10, 0)).validate(60, now).is_ok());
    }
}
