//! Event repository trait for calendar storage.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Event, NewEvent, UserId};

/// Repository trait for calendar event operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store a new event and return it with its assigned ID.
    async fn add_event(&self, new_event: NewEvent) -> RepositoryResult<Event>;

    /// List a user's events ordered ascending by start time.
    async fn list_events(&self, user_id: UserId) -> RepositoryResult<Vec<Event>>;
}
