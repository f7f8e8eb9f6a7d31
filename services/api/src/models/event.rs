//! Event model and related payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::rsvp::RsvpStatus;
use super::user::UserPublic;

/// Event entity as stored; the time of day is kept as a canonical
/// "HH:MM:SS" string alongside the calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub category: Option<String>,
    pub banner_url: Option<String>,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Event creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub category: Option<String>,
}

/// Event response decorated with the organizer profile and RSVP aggregate
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub category: Option<String>,
    pub banner_url: Option<String>,
    pub organizer: UserPublic,
    pub created_at: DateTime<Utc>,
    pub rsvp_count: i64,
    pub rsvp_status: Option<RsvpStatus>,
}

/// Query parameters for event listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilters {
    /// Case-insensitive substring match on location
    pub city: Option<String>,
    /// Case-insensitive substring match on category
    pub category: Option<String>,
    /// Exact calendar date, "YYYY-MM-DD"
    pub date: Option<String>,
}
