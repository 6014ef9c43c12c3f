//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres database
//! holding the `users`, `friends`, and `schedule` tables.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task;

use crate::api::{Event, NewEvent, NewUser, User, UserId, UserInfo};
use crate::db::repository::{
    ErrorContext, EventRepository, FriendRepository, FullRepository, RepositoryError,
    RepositoryResult, UserRepository,
};

mod models;
mod schema;

use models::{EventRow, NewEventRow, NewFriendRow, NewUserRow, UserRow};
use schema::{friends, schedule, users};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module docs for the recognized variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
///
/// This repository implementation provides:
/// - Connection pooling with configurable limits
/// - Automatic retry for transient failures
/// - Health monitoring and statistics
/// - Automatic schema migrations
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries the operation up to `max_retries` times if a retryable error
    /// occurs (connection errors, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                // Get connection
                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                // Execute the operation
                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    /// Get detailed health information.
    ///
    /// Returns a tuple of (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        match self.health_check().await {
            Ok(true) => (true, Some(start.elapsed().as_millis() as u64), None),
            Ok(false) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some(e.to_string()),
            ),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User> {
        self.with_conn(move |conn| {
            let row: UserRow = diesel::insert_into(users::table)
                .values(NewUserRow {
                    username: &new_user.username,
                    password: &new_user.password,
                    timezone: &new_user.timezone,
                })
                .returning(UserRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_user"))?;
            Ok(row.into())
        })
        .await
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            let row: Option<UserRow> = users::table
                .filter(users::username.eq(&username))
                .select(UserRow::as_select())
                .first(conn)
                .optional()
                .map_err(|e| RepositoryError::from(e).with_operation("find_by_username"))?;
            Ok(row.map(Into::into))
        })
        .await
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> RepositoryResult<Option<User>> {
        let username = username.to_string();
        let password = password.to_string();
        self.with_conn(move |conn| {
            // Plaintext comparison against the stored credential, matching
            // the legacy users table.
            let row: Option<UserRow> = users::table
                .filter(users::username.eq(&username))
                .filter(users::password.eq(&password))
                .select(UserRow::as_select())
                .first(conn)
                .optional()
                .map_err(|e| RepositoryError::from(e).with_operation("find_by_credentials"))?;
            Ok(row.map(Into::into))
        })
        .await
    }

    async fn get_user(&self, user_id: UserId) -> RepositoryResult<User> {
        self.with_conn(move |conn| {
            let row: UserRow = users::table
                .find(user_id.value())
                .select(UserRow::as_select())
                .first(conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => RepositoryError::not_found_with_context(
                        format!("User {} not found", user_id),
                        ErrorContext::new("get_user")
                            .with_entity("user")
                            .with_entity_id(user_id),
                    ),
                    other => RepositoryError::from(other).with_operation("get_user"),
                })?;
            Ok(row.into())
        })
        .await
    }
}

#[async_trait]
impl FriendRepository for PostgresRepository {
    async fn friendship_exists(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> RepositoryResult<bool> {
        let (a, b) = (user_id.value(), friend_id.value());
        self.with_conn(move |conn| {
            diesel::select(exists(
                friends::table.filter(
                    friends::user_id
                        .eq(a)
                        .and(friends::friend_id.eq(b))
                        .or(friends::user_id.eq(b).and(friends::friend_id.eq(a))),
                ),
            ))
            .get_result::<bool>(conn)
            .map_err(|e| RepositoryError::from(e).with_operation("friendship_exists"))
        })
        .await
    }

    async fn add_friendship(&self, user_id: UserId, friend_id: UserId) -> RepositoryResult<()> {
        let (a, b) = (user_id.value(), friend_id.value());
        self.with_conn(move |conn| {
            // Both directions in one statement, as the legacy schema expects.
            diesel::insert_into(friends::table)
                .values(&vec![
                    NewFriendRow {
                        user_id: a,
                        friend_id: b,
                    },
                    NewFriendRow {
                        user_id: b,
                        friend_id: a,
                    },
                ])
                .execute(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("add_friendship"))?;
            Ok(())
        })
        .await
    }

    async fn list_friends(&self, user_id: UserId) -> RepositoryResult<Vec<UserInfo>> {
        let id = user_id.value();
        self.with_conn(move |conn| {
            let rows: Vec<(i64, String)> = friends::table
                .inner_join(users::table.on(users::id.eq(friends::friend_id)))
                .filter(friends::user_id.eq(id))
                .select((users::id, users::username))
                .load(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("list_friends"))?;

            Ok(rows
                .into_iter()
                .map(|(friend_id, username)| UserInfo {
                    user_id: UserId::new(friend_id),
                    username,
                })
                .collect())
        })
        .await
    }
}

#[async_trait]
impl EventRepository for PostgresRepository {
    async fn add_event(&self, new_event: NewEvent) -> RepositoryResult<Event> {
        self.with_conn(move |conn| {
            let row: EventRow = diesel::insert_into(schedule::table)
                .values(NewEventRow {
                    user_id: new_event.user_id.value(),
                    title: &new_event.title,
                    start_time: new_event.period.start,
                    end_time: new_event.period.end,
                })
                .returning(EventRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("add_event"))?;
            Ok(row.into())
        })
        .await
    }

    async fn list_events(&self, user_id: UserId) -> RepositoryResult<Vec<Event>> {
        let id = user_id.value();
        self.with_conn(move |conn| {
            let rows: Vec<EventRow> = schedule::table
                .filter(schedule::user_id.eq(id))
                .order(schedule::start_time.asc())
                .select(EventRow::as_select())
                .load(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("list_events"))?;
            Ok(rows.into_iter().map(Into::into).collect())
        })
        .await
    }
}

#[async_trait]
impl FullRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("health_check"))?;
            Ok(true)
        })
        .await
    }
}
