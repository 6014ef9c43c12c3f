//! # SchedYouLater Backend
//!
//! Scheduling-coordination backend for finding mutually free call times.
//!
//! This crate provides the server side of SchedYouLater: users register with a
//! home time zone, maintain a friends list, publish calendar events, and ask
//! for a mutually free time window for a call with a friend. The backend
//! exposes a REST API via Axum for the React frontend.
//!
//! ## Features
//!
//! - **Accounts & Friends**: registration, login, and a bidirectional friend
//!   graph over a relational store
//! - **Calendars**: per-user busy events with ordered listings
//! - **Availability**: free-slot computation and optimal-call-time resolution
//!   between two users, capped at five proposals with a deterministic fallback
//! - **Time Zones**: relabeling of a friend's calendar into the viewer's zone
//!   through an external conversion service, with degraded conversions kept
//!   distinguishable
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Core domain types (users, events, identifiers)
//! - [`models`]: Time-interval value types shared across layers
//! - [`scheduler`]: Free-slot finder and optimal-time resolver
//! - [`db`]: Database operations, repository pattern, and persistence layer
//! - [`services`]: High-level orchestration (availability, time-zone client)
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod scheduler;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
