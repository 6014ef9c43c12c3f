//! Expanded tests for LocalRepository.
//!
//! These tests cover concurrent access patterns, edge cases, and error
//! conditions for the in-memory repository implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use schedyoulater::api::{Interval, NewEvent, NewUser, UserId};
use schedyoulater::db::repositories::LocalRepository;
use schedyoulater::db::repository::{
    EventRepository, FriendRepository, FullRepository, RepositoryError, UserRepository,
};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&format!("2024-10-23T{hour:02}:{min:02}:00Z"))
        .unwrap()
        .with_timezone(&Utc)
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        username: name.to_string(),
        password: "pw".to_string(),
        timezone: "UTC".to_string(),
    }
}

fn new_event(user_id: UserId, title: &str, start_h: u32, end_h: u32) -> NewEvent {
    NewEvent {
        user_id,
        title: title.to_string(),
        period: Interval::new(at(start_h, 0), at(end_h, 0)).unwrap(),
    }
}

// =========================================================
// Concurrent Access Tests
// =========================================================

#[tokio::test]
async fn test_concurrent_user_creation() {
    let repo = Arc::new(LocalRepository::new());

    // Spawn multiple tasks creating different users
    let mut handles = vec![];
    for i in 0..10 {
        let repo_clone = Arc::clone(&repo);
        let handle =
            tokio::spawn(async move { repo_clone.create_user(new_user(&format!("user_{}", i))).await });
        handles.push(handle);
    }

    let mut ids = vec![];
    for handle in handles {
        let user = handle.await.unwrap().unwrap();
        ids.push(user.id.value());
    }

    // Assigned IDs must be unique
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}

#[tokio::test]
async fn test_concurrent_event_writes_same_user() {
    let repo = Arc::new(LocalRepository::new());
    let owner = repo.create_user(new_user("owner")).await.unwrap();

    let mut handles = vec![];
    for i in 0..10u32 {
        let repo_clone = Arc::clone(&repo);
        let user_id = owner.id;
        let handle = tokio::spawn(async move {
            repo_clone
                .add_event(new_event(user_id, &format!("event_{}", i), 9 + i, 10 + i))
                .await
        });
        handles.push(handle);
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let events = repo.list_events(owner.id).await.unwrap();
    assert_eq!(events.len(), 10);
}

// =========================================================
// Edge Cases
// =========================================================

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() {
    let repo = LocalRepository::new();
    repo.create_user(new_user("alice")).await.unwrap();

    let err = repo.create_user(new_user("alice")).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { .. }));
}

#[tokio::test]
async fn test_get_user_not_found() {
    let repo = LocalRepository::new();
    let err = repo.get_user(UserId::new(1)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_credentials_must_match_exactly() {
    let repo = LocalRepository::new();
    repo.create_user(new_user("alice")).await.unwrap();

    assert!(repo
        .find_by_credentials("alice", "pw")
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .find_by_credentials("alice", "PW")
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .find_by_credentials("Alice", "pw")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_friendship_is_stored_in_both_directions() {
    let repo = LocalRepository::new();
    let alice = repo.create_user(new_user("alice")).await.unwrap();
    let bob = repo.create_user(new_user("bob")).await.unwrap();

    repo.add_friendship(alice.id, bob.id).await.unwrap();

    assert!(repo.friendship_exists(alice.id, bob.id).await.unwrap());
    assert!(repo.friendship_exists(bob.id, alice.id).await.unwrap());

    let alices = repo.list_friends(alice.id).await.unwrap();
    let bobs = repo.list_friends(bob.id).await.unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(bobs.len(), 1);
    assert_eq!(alices[0].user_id, bob.id);
    assert_eq!(bobs[0].user_id, alice.id);
}

#[tokio::test]
async fn test_duplicate_friendship_is_a_conflict() {
    let repo = LocalRepository::new();
    let alice = repo.create_user(new_user("alice")).await.unwrap();
    let bob = repo.create_user(new_user("bob")).await.unwrap();

    repo.add_friendship(alice.id, bob.id).await.unwrap();

    // The reverse direction is already covered by the first insert.
    let err = repo.add_friendship(bob.id, alice.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { .. }));
}

#[tokio::test]
async fn test_list_events_is_scoped_to_owner() {
    let repo = LocalRepository::new();
    let alice = repo.create_user(new_user("alice")).await.unwrap();
    let bob = repo.create_user(new_user("bob")).await.unwrap();

    repo.add_event(new_event(alice.id, "hers", 9, 10)).await.unwrap();
    repo.add_event(new_event(bob.id, "his", 11, 12)).await.unwrap();

    let events = repo.list_events(alice.id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "hers");
}

#[tokio::test]
async fn test_list_events_sorted_by_start() {
    let repo = LocalRepository::new();
    let alice = repo.create_user(new_user("alice")).await.unwrap();

    repo.add_event(new_event(alice.id, "late", 15, 16)).await.unwrap();
    repo.add_event(new_event(alice.id, "early", 9, 10)).await.unwrap();

    let events = repo.list_events(alice.id).await.unwrap();
    assert_eq!(events[0].title, "early");
    assert_eq!(events[1].title, "late");
}

#[tokio::test]
async fn test_empty_repository_health_check() {
    let repo = LocalRepository::new();
    assert!(repo.health_check().await.unwrap());
    assert!(repo.list_friends(UserId::new(1)).await.unwrap().is_empty());
    assert!(repo.list_events(UserId::new(1)).await.unwrap().is_empty());
}
