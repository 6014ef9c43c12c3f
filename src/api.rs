//! Public API surface for the backend.
//!
//! This file consolidates the core domain types shared by the repository,
//! service, and HTTP layers. All types derive Serialize/Deserialize for JSON
//! serialization.

use serde::{Deserialize, Serialize};

pub use crate::models::Interval;

/// User identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UserId(pub i64);

/// Calendar event identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        UserId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl EventId {
    pub fn new(value: i64) -> Self {
        EventId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// A registered account.
///
/// The password is stored and compared as plaintext, matching the relational
/// table this backend fronts. Handlers must never serialize this type
/// directly; see `http::dto::UserResponse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database ID
    pub id: UserId,
    /// Unique login name
    pub username: String,
    /// Plaintext credential
    pub password: String,
    /// IANA time zone name declared at registration (e.g. "Europe/Paris")
    pub timezone: String,
}

/// Input for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub timezone: String,
}

/// Lightweight user listing entry (friend lists, lookups).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: UserId,
    pub username: String,
}

/// A busy calendar event owned by a user.
///
/// Start and end are absolute instants; the owner's declared time zone is only
/// used by the presentation layer to relabel them for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Database ID
    pub id: EventId,
    /// Owning user
    pub user_id: UserId,
    /// Display title
    pub title: String,
    /// Busy interval
    pub period: Interval,
}

/// Input for creating a new calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub user_id: UserId,
    pub title: String,
    pub period: Interval,
}

#[cfg(test)]
mod tests {
    use super::{EventId, UserId};

    #[test]
    fn test_user_id_new() {
        let id = UserId::new(42);
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_user_id_equality() {
        let id1 = UserId::new(100);
        let id2 = UserId::new(100);
        let id3 = UserId::new(101);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_user_id_ordering() {
        let id1 = UserId::new(1);
        let id2 = UserId::new(2);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_event_id_new() {
        let id = EventId::new(88);
        assert_eq!(id.value(), 88);
    }

    #[test]
    fn test_ids_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(UserId::new(1));
        set.insert(UserId::new(2));
        set.insert(UserId::new(1)); // Duplicate

        assert_eq!(set.len(), 2);
    }
}
