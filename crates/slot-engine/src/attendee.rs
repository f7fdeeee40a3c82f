//! Attendees and the busy intervals (meetings) they bring to a calendar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::slot::TimeSlot;
use crate::time::calibrate_to_minutes;

/// Descriptive metadata carried alongside a meeting's time range.
///
/// None of it influences availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda: Option<String>,
    /// Names of the people invited.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_paths: Vec<String>,
}

/// A busy interval owned by an attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(flatten)]
    pub slot: TimeSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<MeetingDetails>,
}

impl Meeting {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Ok(Meeting::from_slot(TimeSlot::new(start, end)?))
    }

    pub fn from_slot(slot: TimeSlot) -> Self {
        Meeting {
            id: Uuid::new_v4(),
            slot,
            details: None,
        }
    }

    pub fn with_details(mut self, details: MeetingDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// A meeting is over once its end is at or before `now` (calibrated).
    pub fn is_over(&self, now: DateTime<Utc>) -> bool {
        self.slot.end() <= calibrate_to_minutes(now)
    }
}

/// A person taking part in the calendar, with their busy intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

impl Attendee {
    pub fn new(name: impl Into<String>, meetings: Vec<Meeting>) -> Self {
        Attendee {
            id: Uuid::new_v4(),
            name: name.into(),
            email: None,
            is_optional: false,
            meetings,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Whether this attendee is identified by `name` and `email`.
    pub fn matches_contact(&self, name: &str, email: &str) -> bool {
        self.name == name && self.email.as_deref() == Some(email)
    }

    /// Meetings that still matter at `now`.
    pub fn upcoming_meetings(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Meeting> + '_ {
        self.meetings.iter().filter(move |m| !m.is_over(now))
    }
}
