//! Optimal call-time resolution between two users.
//!
//! Computes each party's free slots inside a shared window and intersects
//! them pairwise into call proposals. The intersection is a bounded lazy
//! producer: pairs are generated in `user x friend` order and collection
//! stops as soon as five proposals exist.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

use super::free_slots::free_slots_capped;
use super::{ensure_positive, SchedulerError, MAX_PROPOSALS};
use crate::models::Interval;

/// Hour of day (local time) at which the default search window opens.
pub const FALLBACK_START_HOUR: u32 = 9;
/// Hour of day (local time) at which the default search window closes.
pub const FALLBACK_END_HOUR: u32 = 21;

/// Result of an optimal-time resolution.
///
/// `proposals` is never empty: when no true overlap exists, a single
/// duration-sized proposal anchored at the window start is returned with
/// `fallback` set. Fallback proposals are not verified against either
/// calendar and must be treated as low-confidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimalTimes {
    /// Call proposals, ascending by start, at most five.
    pub proposals: Vec<Interval>,
    /// True when the proposals were not derived from a real overlap.
    pub fallback: bool,
}

/// Resolve shared call proposals for two busy calendars.
///
/// Both parties are scanned against the same `window`. A party with no stored
/// events is treated as busy for the entire window; together with the
/// guaranteed fallback this means such a request always yields the
/// window-start proposal.
///
/// Every proposal satisfies `end - start == duration` and the list is capped
/// at five entries. A non-positive duration is rejected with
/// [`SchedulerError::InvalidDuration`] before any slots are computed.
pub fn resolve_optimal_times(
    user_events: &[Interval],
    friend_events: &[Interval],
    window: Interval,
    duration: Duration,
) -> Result<OptimalTimes, SchedulerError> {
    ensure_positive(duration)?;

    let user_busy = substitute_if_empty(user_events, window);
    let friend_busy = substitute_if_empty(friend_events, window);

    let user_slots = free_slots_capped(&user_busy, window, duration, MAX_PROPOSALS);
    let friend_slots = free_slots_capped(&friend_busy, window, duration, MAX_PROPOSALS);

    let proposals: Vec<Interval> = user_slots
        .iter()
        .flat_map(|user_slot| {
            friend_slots
                .iter()
                .filter_map(move |friend_slot| user_slot.intersect(friend_slot))
        })
        .filter(|overlap| overlap.duration() >= duration)
        .take(MAX_PROPOSALS)
        .collect();

    if proposals.is_empty() {
        return Ok(OptimalTimes {
            proposals: vec![Interval {
                start: window.start,
                end: window.start + duration,
            }],
            fallback: true,
        });
    }

    Ok(OptimalTimes {
        proposals,
        fallback: false,
    })
}

/// An empty calendar is replaced by a single busy interval covering the
/// whole window.
fn substitute_if_empty(events: &[Interval], window: Interval) -> Vec<Interval> {
    if events.is_empty() {
        vec![window]
    } else {
        events.to_vec()
    }
}

/// Default search window for the current local day (09:00-21:00).
pub fn fallback_window_today() -> Interval {
    fallback_window(Local::now().date_naive())
}

/// Default search window (09:00-21:00 process-local time) for a given day.
///
/// Exposed so callers and tests can pin the day instead of depending on the
/// wall clock.
pub fn fallback_window(day: NaiveDate) -> Interval {
    let start = local_instant(day, FALLBACK_START_HOUR);
    let end = local_instant(day, FALLBACK_END_HOUR);
    Interval::new(start, end).unwrap_or(Interval { start, end: start })
}

fn local_instant(day: NaiveDate, hour: u32) -> DateTime<Utc> {
    let naive = day
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN));
    match naive.and_local_timezone(Local) {
        LocalResult::Single(instant) => instant.with_timezone(&Utc),
        // DST-ambiguous wall times resolve to the earlier instant.
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}
