//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::TimeZoneClient;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Client for the external time-zone conversion service
    pub timezone: TimeZoneClient,
}

impl AppState {
    /// Create a new application state with the given repository and
    /// conversion client.
    pub fn new(repository: Arc<dyn FullRepository>, timezone: TimeZoneClient) -> Self {
        Self {
            repository,
            timezone,
        }
    }
}
