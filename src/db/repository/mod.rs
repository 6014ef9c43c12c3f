//! Abstract repository interface for the relational store.
//!
//! The traits here define the storage operations the rest of the crate
//! depends on, split by entity. [`FullRepository`] combines them for
//! consumers that need the whole store behind one trait object.

use async_trait::async_trait;

pub mod error;
pub mod events;
pub mod friends;
pub mod users;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use events::EventRepository;
pub use friends::FriendRepository;
pub use users::UserRepository;

/// Combined repository trait covering users, friendships, and events.
#[async_trait]
pub trait FullRepository: UserRepository + FriendRepository + EventRepository {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
