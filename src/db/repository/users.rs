//! User repository trait for account storage.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{NewUser, User, UserId};

/// Repository trait for account operations.
///
/// Credentials are stored and compared as plaintext, matching the legacy
/// `users` table this backend fronts. Uniqueness of usernames is enforced by
/// the backing store; callers that want a friendly error should check
/// [`find_by_username`](UserRepository::find_by_username) first.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new account and return it with its assigned ID.
    ///
    /// # Returns
    /// * `Ok(User)` - The stored account
    /// * `Err(RepositoryError::Conflict)` - If the username is already taken
    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User>;

    /// Look up an account by username.
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// Look up an account by username and plaintext password.
    ///
    /// Returns `Ok(None)` when no account matches; an invalid login is not a
    /// repository failure.
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> RepositoryResult<Option<User>>;

    /// Fetch an account by ID.
    ///
    /// # Returns
    /// * `Ok(User)` - The account
    /// * `Err(RepositoryError::NotFound)` - If no such user exists
    async fn get_user(&self, user_id: UserId) -> RepositoryResult<User>;
}
