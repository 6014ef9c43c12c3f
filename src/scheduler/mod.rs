//! Availability scheduling core.
//!
//! This module computes free time slots from busy calendars and resolves an
//! optimal call time between two users. It operates purely on in-memory
//! [`Interval`](crate::models::Interval) values; fetching events and rendering
//! results belong to the surrounding service and HTTP layers.

pub mod free_slots;
pub mod resolver;

pub use free_slots::find_free_slots;
pub use resolver::{fallback_window, fallback_window_today, resolve_optimal_times, OptimalTimes};

use chrono::Duration;

/// Maximum number of slots or proposals ever returned by the scheduler.
pub const MAX_PROPOSALS: usize = 5;

/// Errors produced by the scheduling core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// Requested call duration was zero or negative.
    #[error("call duration must be positive, got {minutes} minutes")]
    InvalidDuration { minutes: i64 },
}

/// Reject non-positive durations before any scanning happens.
fn ensure_positive(duration: Duration) -> Result<(), SchedulerError> {
    if duration <= Duration::zero() {
        return Err(SchedulerError::InvalidDuration {
            minutes: duration.num_minutes(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
