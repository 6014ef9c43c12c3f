//! High-level business logic over any repository implementation.
//!
//! These functions sit between the HTTP handlers and the repository traits
//! and carry the cross-cutting rules: uniqueness checks, friendship symmetry,
//! and input validation. Use these rather than calling the repository
//! directly.

use tracing::{debug, info};

use super::repository::{
    ErrorContext, FullRepository, RepositoryError, RepositoryResult,
};
use crate::api::{Event, NewEvent, NewUser, User, UserId, UserInfo};

/// Check that the backing store is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Register a new account.
///
/// Rejects blank usernames/passwords and duplicate usernames.
pub async fn register_user(
    repo: &dyn FullRepository,
    new_user: NewUser,
) -> RepositoryResult<User> {
    if new_user.username.trim().is_empty() {
        return Err(RepositoryError::validation_with_context(
            "Username must not be empty",
            ErrorContext::new("register_user").with_entity("user"),
        ));
    }
    if new_user.password.is_empty() {
        return Err(RepositoryError::validation_with_context(
            "Password must not be empty",
            ErrorContext::new("register_user").with_entity("user"),
        ));
    }

    if repo.find_by_username(&new_user.username).await?.is_some() {
        return Err(RepositoryError::conflict_with_context(
            "Username already exists",
            ErrorContext::new("register_user").with_entity("user"),
        ));
    }

    let user = repo.create_user(new_user).await?;
    info!(user_id = %user.id, username = %user.username, "registered new user");
    Ok(user)
}

/// Check a username/password pair against the store.
///
/// Returns `Ok(None)` for unknown users or wrong passwords; the caller
/// decides how to render an invalid login.
pub async fn login(
    repo: &dyn FullRepository,
    username: &str,
    password: &str,
) -> RepositoryResult<Option<User>> {
    let user = repo.find_by_credentials(username, password).await?;
    debug!(username, success = user.is_some(), "login attempt");
    Ok(user)
}

/// Fetch an account by ID.
pub async fn get_user(repo: &dyn FullRepository, user_id: UserId) -> RepositoryResult<User> {
    repo.get_user(user_id).await
}

/// Add a friendship by the friend's username.
///
/// The friendship is stored in both directions so either party sees it.
pub async fn add_friend(
    repo: &dyn FullRepository,
    user_id: UserId,
    friend_username: &str,
) -> RepositoryResult<UserInfo> {
    let friend = repo
        .find_by_username(friend_username)
        .await?
        .ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "User not found",
                ErrorContext::new("add_friend")
                    .with_entity("user")
                    .with_details(format!("username={}", friend_username)),
            )
        })?;

    if friend.id == user_id {
        return Err(RepositoryError::validation_with_context(
            "Cannot add yourself as a friend",
            ErrorContext::new("add_friend").with_entity("friendship"),
        ));
    }

    if repo.friendship_exists(user_id, friend.id).await? {
        return Err(RepositoryError::conflict_with_context(
            "You are already friends",
            ErrorContext::new("add_friend").with_entity("friendship"),
        ));
    }

    repo.add_friendship(user_id, friend.id).await?;
    info!(user_id = %user_id, friend_id = %friend.id, "friendship added");

    Ok(UserInfo {
        user_id: friend.id,
        username: friend.username,
    })
}

/// List a user's friends.
pub async fn list_friends(
    repo: &dyn FullRepository,
    user_id: UserId,
) -> RepositoryResult<Vec<UserInfo>> {
    repo.list_friends(user_id).await
}

/// Store a new calendar event.
///
/// The caller provides a validated [`Interval`](crate::models::Interval), so
/// inverted periods cannot reach the store.
pub async fn add_event(repo: &dyn FullRepository, new_event: NewEvent) -> RepositoryResult<Event> {
    // The owner must exist; surfacing NotFound here beats a dangling row.
    repo.get_user(new_event.user_id).await?;

    let event = repo.add_event(new_event).await?;
    debug!(event_id = %event.id, user_id = %event.user_id, "event stored");
    Ok(event)
}

/// List a user's events, ascending by start time.
pub async fn schedule_for(
    repo: &dyn FullRepository,
    user_id: UserId,
) -> RepositoryResult<Vec<Event>> {
    repo.list_events(user_id).await
}
