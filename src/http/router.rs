//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Accounts
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/users/{user_id}", get(handlers::get_user))
        // Friend graph
        .route("/users/{user_id}/friends", get(handlers::list_friends))
        .route("/users/{user_id}/friends", post(handlers::add_friend))
        // Calendar events
        .route("/users/{user_id}/events", get(handlers::get_schedule))
        .route("/users/{user_id}/events", post(handlers::add_event))
        // Friend calendar view and call planning
        .route(
            "/users/{user_id}/friends/{friend_id}/schedule",
            get(handlers::get_friend_schedule),
        )
        .route(
            "/users/{user_id}/friends/{friend_id}/optimal-times",
            get(handlers::get_optimal_times),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::services::TimeZoneClient;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo, TimeZoneClient::from_env());
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
