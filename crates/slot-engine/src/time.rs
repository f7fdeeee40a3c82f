//! Minute calibration, sentinel detection, and the injectable time source.
//!
//! Every timestamp that enters the engine is calibrated to whole minutes
//! (seconds and sub-second parts dropped). The extreme representable instants
//! are treated as "unset" sentinels and rejected at the boundary.

use std::fmt::Debug;

use chrono::{DateTime, Timelike, Utc};

/// Truncate a timestamp to whole-minute resolution.
pub fn calibrate_to_minutes(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// Whether a timestamp is one of the "unset" sentinels (the minimum or maximum
/// representable UTC instant).
pub fn is_sentinel(ts: DateTime<Utc>) -> bool {
    ts == DateTime::<Utc>::MIN_UTC || ts == DateTime::<Utc>::MAX_UTC
}

/// Whole minutes between two calibrated timestamps (`end - start`).
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_minutes()
}

/// Source of "now" for past-meeting and past-window decisions.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
