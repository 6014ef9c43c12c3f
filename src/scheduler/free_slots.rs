//! Free-slot computation over a single busy calendar.
//!
//! Scans the gaps between busy intervals inside a bounding window and emits
//! duration-sized slots, capped at [`MAX_PROPOSALS`](super::MAX_PROPOSALS).

use chrono::Duration;

use super::{ensure_positive, SchedulerError, MAX_PROPOSALS};
use crate::models::Interval;

/// Find free slots of exactly `duration` within `window`, given a list of
/// busy intervals.
///
/// Busy intervals may be unsorted, overlapping, or nested; the scan keeps a
/// monotonically advancing cursor so contained intervals never move it
/// backwards. Every returned slot satisfies `end - start == duration`, slots
/// are non-overlapping and strictly ascending by start, and at most five are
/// returned.
///
/// Returns an empty list when the window is shorter than the requested
/// duration. A non-positive duration is rejected with
/// [`SchedulerError::InvalidDuration`].
pub fn find_free_slots(
    events: &[Interval],
    window: Interval,
    duration: Duration,
) -> Result<Vec<Interval>, SchedulerError> {
    ensure_positive(duration)?;
    Ok(free_slots_capped(events, window, duration, MAX_PROPOSALS))
}

/// Cursor scan over sorted busy intervals. Assumes a validated duration.
pub(crate) fn free_slots_capped(
    events: &[Interval],
    window: Interval,
    duration: Duration,
    limit: usize,
) -> Vec<Interval> {
    let mut busy: Vec<Interval> = events.to_vec();
    // Stable sort; ties keep input order, which is unobservable since only
    // the gaps matter.
    busy.sort_by_key(|event| event.start);

    let mut slots = Vec::new();
    let mut cursor = window.start;

    for event in &busy {
        if cursor < event.start && event.start - cursor >= duration {
            slots.push(Interval {
                start: cursor,
                end: cursor + duration,
            });
            if slots.len() >= limit {
                return slots;
            }
        }
        cursor = cursor.max(event.end);
    }

    // Remaining room after the last busy interval.
    if slots.len() < limit && cursor < window.end && window.end - cursor >= duration {
        slots.push(Interval {
            start: cursor,
            end: cursor + duration,
        });
    }

    slots
}
