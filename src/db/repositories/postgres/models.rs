//! Diesel row types for the Postgres repository.
//!
//! Row structs mirror the table schema; conversions into the API types strip
//! database-only columns such as `created_at`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{friends, schedule, users};
use crate::api::{Event, EventId, Interval, User, UserId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            username: row.username,
            password: row.password,
            timezone: row.timezone,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub timezone: &'a str,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = friends)]
pub struct NewFriendRow {
    pub user_id: i64,
    pub friend_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedule)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EventRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: EventId::new(row.id),
            user_id: UserId::new(row.user_id),
            title: row.title,
            period: Interval {
                start: row.start_time,
                end: row.end_time,
            },
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schedule)]
pub struct NewEventRow<'a> {
    pub user_id: i64,
    pub title: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
