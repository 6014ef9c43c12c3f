//! Service layer for orchestration above the repository.
//!
//! This module contains the services that combine repository reads with the
//! scheduling core and the external time-zone conversion API.

pub mod availability;
pub mod timezone;

pub use availability::{find_optimal_times, AvailabilityError, OptimalTimeReport};
pub use timezone::{convert_events, RelabeledEvent, TimeZoneClient, TimeZoneConversion};
