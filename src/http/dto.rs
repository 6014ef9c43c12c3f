//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Instants travel as RFC 3339 strings; durations as whole minutes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{Event, User, UserInfo};
use crate::models::Interval;

pub use crate::services::RelabeledEvent;

/// Request body for registering a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// IANA zone name, e.g. "America/New_York"
    pub timezone: String,
}

/// Request body for logging in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of an account. The stored credential is never echoed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub timezone: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.value(),
            username: user.username,
            timezone: user.timezone,
        }
    }
}

/// Request body for adding a friend by username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFriendRequest {
    pub friend_username: String,
}

/// Generic confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Friend list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendDto {
    pub id: i64,
    pub username: String,
}

impl From<UserInfo> for FriendDto {
    fn from(info: UserInfo) -> Self {
        Self {
            id: info.user_id.value(),
            username: info.username,
        }
    }
}

/// Friend list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendListResponse {
    pub friends: Vec<FriendDto>,
    pub total: usize,
}

/// Request body for creating a calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEventRequest {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// A stored calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.value(),
            title: event.title,
            start_time: event.period.start,
            end_time: event.period.end,
        }
    }
}

/// Event list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub events: Vec<EventDto>,
    pub total: usize,
}

/// A friend's calendar relabeled into the viewer's zone.
#[derive(Debug, Clone, Serialize)]
pub struct FriendScheduleResponse {
    /// The friend's declared zone (source of the relabeling)
    pub friend_timezone: String,
    /// The viewer's declared zone (target of the relabeling)
    pub viewer_timezone: String,
    pub events: Vec<RelabeledEvent>,
}

/// Query parameters for the optimal-times endpoint.
///
/// `window_start`/`window_end` override the default 09:00-21:00 local-day
/// search window; they must be supplied together.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OptimalTimesQuery {
    pub duration_minutes: i64,
    #[serde(default)]
    pub window_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub window_end: Option<DateTime<Utc>>,
}

/// A single call proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalDto {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<Interval> for ProposalDto {
    fn from(interval: Interval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
        }
    }
}

/// Optimal-times response.
#[derive(Debug, Clone, Serialize)]
pub struct OptimalTimesResponse {
    /// Call proposals, ascending by start, at most five
    pub proposals: Vec<ProposalDto>,
    /// True when the proposals are the unverified window-start fallback;
    /// treat such results as low-confidence
    pub fallback: bool,
    /// The friend's declared zone, for display relabeling
    pub friend_timezone: String,
    /// The window the resolution ran against
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
