//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    AddEventRequest, AddFriendRequest, EventDto, FriendDto, FriendListResponse,
    FriendScheduleResponse, HealthResponse, LoginRequest, MessageResponse, OptimalTimesQuery,
    OptimalTimesResponse, ProposalDto, RegisterRequest, ScheduleResponse, UserResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{NewEvent, NewUser, UserId};
use crate::db::services as db_services;
use crate::models::Interval;
use crate::services::{availability, timezone};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Accounts
// =============================================================================

/// POST /v1/register
///
/// Create a new account. Duplicate usernames are rejected with 400.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<UserResponse>), AppError> {
    let user = db_services::register_user(
        state.repository.as_ref(),
        NewUser {
            username: request.username,
            password: request.password,
            timezone: request.timezone,
        },
    )
    .await?;

    Ok((axum::http::StatusCode::CREATED, Json(user.into())))
}

/// POST /v1/login
///
/// Check credentials and return the matching account.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> HandlerResult<UserResponse> {
    let user = db_services::login(
        state.repository.as_ref(),
        &request.username,
        &request.password,
    )
    .await?
    .ok_or_else(|| AppError::BadRequest("Invalid credentials".to_string()))?;

    Ok(Json(user.into()))
}

/// GET /v1/users/{user_id}
///
/// Fetch a user's public profile (used for time-zone lookups).
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> HandlerResult<UserResponse> {
    let user = db_services::get_user(state.repository.as_ref(), UserId::new(user_id)).await?;
    Ok(Json(user.into()))
}

// =============================================================================
// Friends
// =============================================================================

/// POST /v1/users/{user_id}/friends
///
/// Add a friend by username. The friendship is stored in both directions.
pub async fn add_friend(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<AddFriendRequest>,
) -> HandlerResult<MessageResponse> {
    let friend = db_services::add_friend(
        state.repository.as_ref(),
        UserId::new(user_id),
        &request.friend_username,
    )
    .await?;

    Ok(Json(MessageResponse {
        message: format!("{} added as a friend", friend.username),
    }))
}

/// GET /v1/users/{user_id}/friends
///
/// List a user's friends.
pub async fn list_friends(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> HandlerResult<FriendListResponse> {
    let friends =
        db_services::list_friends(state.repository.as_ref(), UserId::new(user_id)).await?;

    let friend_dtos: Vec<FriendDto> = friends.into_iter().map(Into::into).collect();
    let total = friend_dtos.len();

    Ok(Json(FriendListResponse {
        friends: friend_dtos,
        total,
    }))
}

// =============================================================================
// Calendar Events
// =============================================================================

/// POST /v1/users/{user_id}/events
///
/// Store a busy event on the user's calendar.
pub async fn add_event(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<AddEventRequest>,
) -> Result<(axum::http::StatusCode, Json<EventDto>), AppError> {
    let period = Interval::new(request.start_time, request.end_time).ok_or_else(|| {
        AppError::BadRequest("Event start time must not be after its end time".to_string())
    })?;

    let event = db_services::add_event(
        state.repository.as_ref(),
        NewEvent {
            user_id: UserId::new(user_id),
            title: request.title,
            period,
        },
    )
    .await?;

    Ok((axum::http::StatusCode::CREATED, Json(event.into())))
}

/// GET /v1/users/{user_id}/events
///
/// List the user's events, ascending by start time.
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> HandlerResult<ScheduleResponse> {
    let events =
        db_services::schedule_for(state.repository.as_ref(), UserId::new(user_id)).await?;

    let event_dtos: Vec<EventDto> = events.into_iter().map(Into::into).collect();
    let total = event_dtos.len();

    Ok(Json(ScheduleResponse {
        events: event_dtos,
        total,
    }))
}

/// GET /v1/users/{user_id}/friends/{friend_id}/schedule
///
/// A friend's calendar relabeled into the viewer's zone. Degraded
/// conversions keep the original instants and are marked `converted: false`.
pub async fn get_friend_schedule(
    State(state): State<AppState>,
    Path((user_id, friend_id)): Path<(i64, i64)>,
) -> HandlerResult<FriendScheduleResponse> {
    let repo = state.repository.as_ref();
    let (viewer, friend, events) = futures::try_join!(
        db_services::get_user(repo, UserId::new(user_id)),
        db_services::get_user(repo, UserId::new(friend_id)),
        db_services::schedule_for(repo, UserId::new(friend_id)),
    )?;

    let relabeled =
        timezone::convert_events(&state.timezone, &events, &friend.timezone, &viewer.timezone)
            .await;

    Ok(Json(FriendScheduleResponse {
        friend_timezone: friend.timezone,
        viewer_timezone: viewer.timezone,
        events: relabeled,
    }))
}

// =============================================================================
// Optimal Call Times
// =============================================================================

/// GET /v1/users/{user_id}/friends/{friend_id}/optimal-times
///
/// Resolve up to five shared call proposals of the requested duration.
/// Without an explicit window the default 09:00-21:00 local-day window is
/// used; `fallback: true` marks the low-confidence window-start proposal
/// returned when no true overlap exists.
pub async fn get_optimal_times(
    State(state): State<AppState>,
    Path((user_id, friend_id)): Path<(i64, i64)>,
    Query(query): Query<OptimalTimesQuery>,
) -> HandlerResult<OptimalTimesResponse> {
    let window = match (query.window_start, query.window_end) {
        (Some(start), Some(end)) => Some(Interval::new(start, end).ok_or_else(|| {
            AppError::BadRequest("window_start must not be after window_end".to_string())
        })?),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "window_start and window_end must be supplied together".to_string(),
            ))
        }
    };

    let report = availability::find_optimal_times(
        state.repository.as_ref(),
        UserId::new(user_id),
        UserId::new(friend_id),
        query.duration_minutes,
        window,
    )
    .await?;

    Ok(Json(OptimalTimesResponse {
        proposals: report.proposals.into_iter().map(ProposalDto::from).collect(),
        fallback: report.fallback,
        friend_timezone: report.friend_timezone,
        window_start: report.window.start,
        window_end: report.window.end,
    }))
}
