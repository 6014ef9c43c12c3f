//! Friendship repository trait for the friend graph.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{UserId, UserInfo};

/// Repository trait for friendship operations.
///
/// Friendships are symmetric: adding one stores both directed rows, so a
/// single-direction listing query sees the relation from either side.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait FriendRepository: Send + Sync {
    /// Check whether a friendship exists between two users, in either direction.
    async fn friendship_exists(&self, user_id: UserId, friend_id: UserId)
        -> RepositoryResult<bool>;

    /// Store the friendship in both directions.
    ///
    /// Callers are expected to check [`friendship_exists`](FriendRepository::friendship_exists)
    /// first; backing stores may additionally reject duplicates with
    /// `RepositoryError::Conflict`.
    async fn add_friendship(&self, user_id: UserId, friend_id: UserId) -> RepositoryResult<()>;

    /// List a user's friends as lightweight entries.
    async fn list_friends(&self, user_id: UserId) -> RepositoryResult<Vec<UserInfo>>;
}
