//! # slot-engine
//!
//! Free meeting slots across many attendees' busy intervals, at minute
//! granularity.
//!
//! A [`Calendar`] owns a bounded window and a set of [`Attendee`]s. Each query
//! builds a fresh per-minute [`Timeline`] defaulted to available, marks every
//! upcoming busy interval (clipped to the window) as scheduled, and scans the
//! result once to emit maximal free [`TimeSlot`]s.
//!
//! ## Modules
//!
//! - [`time`] — minute calibration, sentinels, and the injectable clock
//! - [`slot`] — the closed, calibrated interval type
//! - [`attendee`] — attendees and their meetings
//! - [`timeline`] — per-minute availability, clipping, and marking
//! - [`fill`] — sequential and fanned-out timeline fill
//! - [`extract`] — free slot extraction from a filled timeline
//! - [`select`] — tightest-fit selection and search ranges
//! - [`calendar`] — window management and the query API
//! - [`error`] — Error types

pub mod attendee;
pub mod calendar;
pub mod error;
pub mod extract;
pub mod fill;
pub mod select;
pub mod slot;
pub mod time;
pub mod timeline;

pub use attendee::{Attendee, Meeting, MeetingDetails};
pub use calendar::Calendar;
pub use error::SlotError;
pub use extract::extract_free_slots;
pub use fill::{FillStrategy, FillThresholds};
pub use select::{tightest_fit, SearchRange};
pub use slot::TimeSlot;
pub use time::{Clock, FixedClock, SystemClock};
pub use timeline::{clip_to_window, Availability, Timeline, MAX_TIMELINE_MINUTES};
