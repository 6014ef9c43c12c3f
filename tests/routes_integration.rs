//! Integration tests for the HTTP layer wiring: router construction, DTO
//! shapes, and service-backed flows the handlers delegate to.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use schedyoulater::api::{NewUser, UserId};
use schedyoulater::db::repositories::LocalRepository;
use schedyoulater::db::repository::FullRepository;
use schedyoulater::db::services;
use schedyoulater::http::dto::{
    AddFriendRequest, OptimalTimesQuery, RegisterRequest, UserResponse,
};
use schedyoulater::http::{create_router, AppState};
use schedyoulater::services::TimeZoneClient;

#[test]
fn test_router_builds_with_local_repository() {
    let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
    let state = AppState::new(repo, TimeZoneClient::new("http://localhost:0"));
    let _router = create_router(state);
}

#[test]
fn test_register_request_parses() {
    let raw = r#"{"username":"alice","password":"pw","timezone":"Europe/London"}"#;
    let request: RegisterRequest = serde_json::from_str(raw).unwrap();
    assert_eq!(request.username, "alice");
    assert_eq!(request.timezone, "Europe/London");
}

#[test]
fn test_user_response_never_contains_password() {
    let response = UserResponse {
        id: 1,
        username: "alice".to_string(),
        timezone: "Europe/London".to_string(),
    };
    let json = serde_json::to_string(&response).unwrap();
    assert!(!json.contains("password"));
}

#[test]
fn test_optimal_times_query_defaults() {
    let query: OptimalTimesQuery =
        serde_json::from_str(r#"{"duration_minutes":45}"#).unwrap();
    assert_eq!(query.duration_minutes, 45);
    assert!(query.window_start.is_none());
    assert!(query.window_end.is_none());
}

#[test]
fn test_add_friend_request_parses() {
    let request: AddFriendRequest =
        serde_json::from_str(r#"{"friend_username":"bob"}"#).unwrap();
    assert_eq!(request.friend_username, "bob");
}

#[tokio::test]
async fn test_registration_flow_through_services() {
    let repo = LocalRepository::new();

    let user = services::register_user(
        &repo,
        NewUser {
            username: "alice".to_string(),
            password: "pw".to_string(),
            timezone: "Europe/London".to_string(),
        },
    )
    .await
    .unwrap();

    let fetched = services::get_user(&repo, user.id).await.unwrap();
    assert_eq!(fetched.username, "alice");

    let missing = services::get_user(&repo, UserId::new(999)).await;
    assert!(missing.is_err());
}
