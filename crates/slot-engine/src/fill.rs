//! Merging busy intervals into a timeline, sequentially or fanned out.
//!
//! The parallel path partitions the busy intervals across scoped worker
//! threads. Each worker marks a private copy of the timeline and the copies
//! are OR-reduced into the original, so there is no shared mutable state and
//! no locking. Both paths produce identical timelines.

use std::num::NonZeroUsize;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::slot::TimeSlot;
use crate::timeline::Timeline;

/// How busy intervals are merged into the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    Sequential,
    Parallel,
}

/// Problem-size knob for choosing a [`FillStrategy`].
///
/// A query runs sequentially when both the attendee count and the window
/// length are within their limits; anything larger fans out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillThresholds {
    pub max_sequential_attendees: usize,
    pub max_sequential_window_minutes: i64,
}

impl Default for FillThresholds {
    fn default() -> Self {
        FillThresholds {
            max_sequential_attendees: 8,
            max_sequential_window_minutes: 960,
        }
    }
}

impl FillThresholds {
    pub fn strategy_for(&self, attendees: usize, window_minutes: i64) -> FillStrategy {
        if attendees <= self.max_sequential_attendees
            && window_minutes <= self.max_sequential_window_minutes
        {
            FillStrategy::Sequential
        } else {
            FillStrategy::Parallel
        }
    }
}

/// Mark every busy interval on the timeline using the given strategy.
pub fn fill(timeline: &mut Timeline, busy: &[TimeSlot], strategy: FillStrategy) -> Result<()> {
    match strategy {
        FillStrategy::Sequential => {
            fill_sequential(timeline, busy);
            Ok(())
        }
        FillStrategy::Parallel => fill_parallel(timeline, busy),
    }
}

pub fn fill_sequential(timeline: &mut Timeline, busy: &[TimeSlot]) {
    for slot in busy {
        let newly = timeline.mark_scheduled(slot);
        trace!(slot = %slot, newly, "marked busy interval");
    }
}

pub fn fill_parallel(timeline: &mut Timeline, busy: &[TimeSlot]) -> Result<()> {
    if busy.is_empty() {
        return Ok(());
    }

    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(busy.len());
    let chunk_size = busy.len().div_ceil(workers);

    let base: &Timeline = timeline;
    let partials: Vec<Timeline> = thread::scope(|scope| {
        let handles: Vec<_> = busy
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    let mut partial = base.clone();
                    fill_sequential(&mut partial, chunk);
                    partial
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    });

    trace!(workers = partials.len(), chunk_size, "reducing partial timelines");
    for partial in &partials {
        timeline.merge(partial)?;
    }
    Ok(())
}
