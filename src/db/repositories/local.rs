//! In-memory repository implementation.
//!
//! Backs the full repository interface with plain vectors behind a
//! `parking_lot` RwLock. Used for unit testing and local development; data
//! lives only as long as the process.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{Event, EventId, NewEvent, NewUser, User, UserId, UserInfo};
use crate::db::repository::{
    ErrorContext, EventRepository, FriendRepository, FullRepository, RepositoryError,
    RepositoryResult, UserRepository,
};

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    next_user_id: i64,
    /// Directed edges; both directions are stored for every friendship.
    friendships: Vec<(i64, i64)>,
    events: Vec<Event>,
    next_event_id: i64,
}

/// Thread-safe in-memory repository.
#[derive(Debug, Default)]
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User> {
        let mut inner = self.inner.write();

        if inner
            .users
            .iter()
            .any(|user| user.username == new_user.username)
        {
            return Err(RepositoryError::conflict_with_context(
                format!("Username '{}' already exists", new_user.username),
                ErrorContext::new("create_user").with_entity("user"),
            ));
        }

        inner.next_user_id += 1;
        let user = User {
            id: UserId::new(inner.next_user_id),
            username: new_user.username,
            password: new_user.password,
            timezone: new_user.timezone,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let inner = self.inner.read();
        Ok(inner
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> RepositoryResult<Option<User>> {
        let inner = self.inner.read();
        Ok(inner
            .users
            .iter()
            .find(|user| user.username == username && user.password == password)
            .cloned())
    }

    async fn get_user(&self, user_id: UserId) -> RepositoryResult<User> {
        let inner = self.inner.read();
        inner
            .users
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("User {} not found", user_id),
                    ErrorContext::new("get_user")
                        .with_entity("user")
                        .with_entity_id(user_id),
                )
            })
    }
}

#[async_trait]
impl FriendRepository for LocalRepository {
    async fn friendship_exists(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> RepositoryResult<bool> {
        let inner = self.inner.read();
        Ok(inner
            .friendships
            .iter()
            .any(|&(a, b)| (a, b) == (user_id.0, friend_id.0) || (a, b) == (friend_id.0, user_id.0)))
    }

    async fn add_friendship(&self, user_id: UserId, friend_id: UserId) -> RepositoryResult<()> {
        if self.friendship_exists(user_id, friend_id).await? {
            return Err(RepositoryError::conflict_with_context(
                format!("Users {} and {} are already friends", user_id, friend_id),
                ErrorContext::new("add_friendship").with_entity("friendship"),
            ));
        }

        let mut inner = self.inner.write();
        inner.friendships.push((user_id.0, friend_id.0));
        inner.friendships.push((friend_id.0, user_id.0));
        Ok(())
    }

    async fn list_friends(&self, user_id: UserId) -> RepositoryResult<Vec<UserInfo>> {
        let inner = self.inner.read();
        let friends = inner
            .friendships
            .iter()
            .filter(|&&(a, _)| a == user_id.0)
            .filter_map(|&(_, b)| {
                inner
                    .users
                    .iter()
                    .find(|user| user.id.0 == b)
                    .map(|user| UserInfo {
                        user_id: user.id,
                        username: user.username.clone(),
                    })
            })
            .collect();
        Ok(friends)
    }
}

#[async_trait]
impl EventRepository for LocalRepository {
    async fn add_event(&self, new_event: NewEvent) -> RepositoryResult<Event> {
        let mut inner = self.inner.write();

        inner.next_event_id += 1;
        let event = Event {
            id: EventId::new(inner.next_event_id),
            user_id: new_event.user_id,
            title: new_event.title,
            period: new_event.period,
        };
        inner.events.push(event.clone());
        Ok(event)
    }

    async fn list_events(&self, user_id: UserId) -> RepositoryResult<Vec<Event>> {
        let inner = self.inner.read();
        let mut events: Vec<Event> = inner
            .events
            .iter()
            .filter(|event| event.user_id == user_id)
            .cloned()
            .collect();
        events.sort_by_key(|event| event.period.start);
        Ok(events)
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
