//! The calendar window, its attendees, and the slot search API.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::attendee::Attendee;
use crate::error::{Result, SlotError};
use crate::extract::{extract_free_slots, whole_window};
use crate::fill::{fill, FillStrategy, FillThresholds};
use crate::select::{tightest_fit, validate_duration, SearchRange};
use crate::slot::TimeSlot;
use crate::time::{calibrate_to_minutes, is_sentinel, minutes_between, Clock, SystemClock};
use crate::timeline::{clip_to_window, Timeline};

/// A bounded window `[start, end)` shared by a set of attendees.
///
/// Queries are computed from scratch on every call; nothing is cached between
/// them. Structural changes to the attendee list need `&mut self`, so callers
/// serialize them through ordinary borrowing.
#[derive(Debug, Clone)]
pub struct Calendar {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    attendees: Vec<Attendee>,
    thresholds: FillThresholds,
    clock: Arc<dyn Clock>,
}

impl Calendar {
    /// Create an empty calendar over `[start, end)`.
    ///
    /// Both bounds are calibrated to minutes; sentinels and windows that are
    /// empty after calibration are rejected.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if is_sentinel(start) {
            return Err(SlotError::invalid("start", "invalid Calendar start time"));
        }
        if is_sentinel(end) {
            return Err(SlotError::invalid("end", "invalid Calendar end time"));
        }

        let start = calibrate_to_minutes(start);
        let end = calibrate_to_minutes(end);
        if start >= end {
            return Err(SlotError::invalid(
                "end",
                "the Calendar end time must be after the start time",
            ));
        }

        Ok(Calendar {
            start,
            end,
            attendees: Vec::new(),
            thresholds: FillThresholds::default(),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_attendees(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        attendees: Vec<Attendee>,
    ) -> Result<Self> {
        let mut calendar = Calendar::new(start, end)?;
        calendar.attendees = attendees;
        Ok(calendar)
    }

    /// Use `window` as the calendar bounds.
    pub fn from_window(window: TimeSlot) -> Result<Self> {
        Calendar::new(window.start(), window.end())
    }

    /// Replace the time source used for "now".
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_fill_thresholds(mut self, thresholds: FillThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn window(&self) -> TimeSlot {
        TimeSlot::from_calibrated(self.start, self.end)
    }

    /// Length of the window in minutes.
    pub fn window_minutes(&self) -> i64 {
        minutes_between(self.start, self.end)
    }

    /// "Now", calibrated to minutes.
    pub fn current_time(&self) -> DateTime<Utc> {
        calibrate_to_minutes(self.clock.now())
    }

    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    pub fn attendee_count(&self) -> usize {
        self.attendees.len()
    }

    pub fn fill_thresholds(&self) -> FillThresholds {
        self.thresholds
    }

    /// Strategy the next query will use to fill its timeline.
    pub fn fill_strategy(&self) -> FillStrategy {
        self.thresholds.strategy_for(self.attendees.len(), self.window_minutes())
    }

    /// Replace the attendee list.
    pub fn add_attendees(&mut self, attendees: Vec<Attendee>) {
        self.attendees = attendees;
    }

    /// Append to the attendee list.
    pub fn append_attendees(&mut self, attendees: Vec<Attendee>) {
        self.attendees.extend(attendees);
    }

    /// Remove the first attendee equal to `attendee`.
    pub fn remove_attendee(&mut self, attendee: &Attendee) -> bool {
        self.remove_first(|a| a == attendee)
    }

    pub fn remove_attendee_by_id(&mut self, id: Uuid) -> bool {
        self.remove_first(|a| a.id == id)
    }

    pub fn remove_attendee_by_contact(&mut self, name: &str, email: &str) -> bool {
        self.remove_first(|a| a.matches_contact(name, email))
    }

    fn remove_first(&mut self, pred: impl Fn(&Attendee) -> bool) -> bool {
        match self.attendees.iter().position(pred) {
            Some(index) => {
                self.attendees.remove(index);
                true
            }
            None => false,
        }
    }

    /// All free slots from `max(start, now)` to the end of the window, in
    /// ascending order.
    ///
    /// A window that has already ended yields nothing. Without attendees the
    /// whole remaining window is one slot. Meetings that are over are skipped;
    /// the rest are clipped to the window before being marked.
    pub fn available_slots(&self) -> Result<Vec<TimeSlot>> {
        let now = self.current_time();
        if self.end <= now {
            debug!(end = %self.end, now = %now, "calendar window is in the past");
            return Ok(Vec::new());
        }

        let mut timeline = Timeline::build(self.start.max(now), self.end)?;
        if self.attendees.is_empty() {
            return Ok(vec![whole_window(&timeline)]);
        }

        let busy: Vec<TimeSlot> = self
            .attendees
            .iter()
            .flat_map(|attendee| attendee.upcoming_meetings(now))
            .filter_map(|meeting| clip_to_window(&meeting.slot, self.start, self.end))
            .collect();

        let strategy = self.fill_strategy();
        fill(&mut timeline, &busy, strategy)?;

        let slots = if timeline.has_available() {
            extract_free_slots(&timeline)
        } else {
            Vec::new()
        };

        debug!(
            attendees = self.attendees.len(),
            busy_intervals = busy.len(),
            scheduled_minutes = timeline.scheduled_minutes(),
            ?strategy,
            slots = slots.len(),
            "computed free slots"
        );
        Ok(slots)
    }

    /// The tightest free slot lasting at least `duration` minutes.
    pub fn find_first_available_slot(&self, duration: i64) -> Result<Option<TimeSlot>> {
        validate_duration(duration)?;
        Ok(tightest_fit(self.available_slots()?, duration))
    }

    /// The tightest free slot lasting at least `duration` minutes once every
    /// free slot is clamped onto `range` (itself clamped to the window).
    pub fn find_first_available_slot_within(
        &self,
        duration: i64,
        range: SearchRange,
    ) -> Result<Option<TimeSlot>> {
        range.validate(duration, self.clock.now())?;

        let to = range.end.unwrap_or(self.end);
        let lower = if range.start >= self.start {
            calibrate_to_minutes(range.start)
        } else {
            self.start
        };
        let upper = if to >= self.end {
            self.end
        } else {
            calibrate_to_minutes(to)
        };
        if lower > upper {
            return Ok(None);
        }

        let mapped = self
            .available_slots()?
            .into_iter()
            .filter_map(|slot| slot.map_to_range(lower, upper));
        Ok(tightest_fit(mapped, duration))
    }

    /// Shift the window to `[end, end + window)`, clearing attendees if asked.
    pub fn move_forward(&mut self, clear_attendees: bool) -> Result<()> {
        let shift = Duration::minutes(self.window_minutes());
        let end = self.end.checked_add_signed(shift).ok_or_else(|| {
            SlotError::invalid("end", "cannot move the Calendar past the latest representable time")
        })?;
        if is_sentinel(end) {
            return Err(SlotError::invalid("end", "moved Calendar end time would be invalid"));
        }

        self.start = self.end;
        self.end = end;
        if clear_attendees {
            self.attendees.clear();
        }
        Ok(())
    }

    /// Shift the window forward and replace the attendees.
    pub fn move_forward_with(&mut self, attendees: Vec<Attendee>) -> Result<()> {
        self.move_forward(true)?;
        self.add_attendees(attendees);
        Ok(())
    }

    /// Shift the window to `[start - window, start)`, clearing attendees if asked.
    pub fn move_backward(&mut self, clear_attendees: bool) -> Result<()> {
        let shift = Duration::minutes(self.window_minutes());
        let start = self.start.checked_sub_signed(shift).ok_or_else(|| {
            SlotError::invalid("start", "cannot move the Calendar before the earliest representable time")
        })?;
        if is_sentinel(start) {
            return Err(SlotError::invalid("start", "moved Calendar start time would be invalid"));
        }

        self.end = self.start;
        self.start = start;
        if clear_attendees {
            self.attendees.clear();
        }
        Ok(())
    }

    /// Shift the window backward and replace the attendees.
    pub fn move_backward_with(&mut self, attendees: Vec<Attendee>) -> Result<()> {
        self.move_backward(true)?;
        self.add_attendees(attendees);
        Ok(())
    }
}
