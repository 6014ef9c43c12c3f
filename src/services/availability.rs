//! Optimal call-time orchestration between two stored users.
//!
//! Fetches both parties' calendars and the friend's profile, then hands the
//! busy intervals to the scheduling core. All repository reads are
//! independent and issued concurrently; resolution only proceeds once every
//! read has completed, and any failed read aborts the request.

use chrono::Duration;
use tracing::debug;

use crate::api::{Interval, UserId};
use crate::db::repository::{FullRepository, RepositoryError};
use crate::scheduler::{
    fallback_window_today, resolve_optimal_times, SchedulerError,
};

/// Errors produced while resolving optimal call times.
#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Outcome of an optimal-time resolution, ready for presentation.
#[derive(Debug, Clone)]
pub struct OptimalTimeReport {
    /// The window the resolution ran against.
    pub window: Interval,
    /// Call proposals, ascending by start, at most five.
    pub proposals: Vec<Interval>,
    /// True when the proposals are the unverified window-start fallback.
    pub fallback: bool,
    /// The friend's declared IANA zone, for display relabeling.
    pub friend_timezone: String,
}

/// Resolve shared call proposals for `user_id` and `friend_id`.
///
/// When `window` is `None` the default 09:00-21:00 local-day window is used;
/// passing an explicit window makes the resolution fully deterministic.
pub async fn find_optimal_times(
    repo: &dyn FullRepository,
    user_id: UserId,
    friend_id: UserId,
    duration_minutes: i64,
    window: Option<Interval>,
) -> Result<OptimalTimeReport, AvailabilityError> {
    let duration = Duration::minutes(duration_minutes);
    if duration <= Duration::zero() {
        return Err(SchedulerError::InvalidDuration {
            minutes: duration_minutes,
        }
        .into());
    }

    // Three independent reads; all must complete before resolution proceeds.
    let (user_events, friend_events, friend) = futures::try_join!(
        repo.list_events(user_id),
        repo.list_events(friend_id),
        repo.get_user(friend_id),
    )?;

    let user_busy: Vec<Interval> = user_events.iter().map(|event| event.period).collect();
    let friend_busy: Vec<Interval> = friend_events.iter().map(|event| event.period).collect();

    let window = window.unwrap_or_else(fallback_window_today);
    let resolved = resolve_optimal_times(&user_busy, &friend_busy, window, duration)?;

    debug!(
        %user_id,
        %friend_id,
        proposals = resolved.proposals.len(),
        fallback = resolved.fallback,
        "resolved optimal call times"
    );

    Ok(OptimalTimeReport {
        window,
        proposals: resolved.proposals,
        fallback: resolved.fallback,
        friend_timezone: friend.timezone,
    })
}
