//! Event repository for database operations
//!
//! Listing queries return rows decorated with the organizer profile, the
//! "yes" RSVP count, and the viewer's own RSVP status when an identity is
//! supplied.

use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateEvent, Event, EventResponse, RsvpStatus, UserPublic};
use crate::validation::EventUpdate;

/// Shared SELECT for decorated event rows; `$1` is the optional viewer id.
const DECORATED_SELECT: &str = r#"
    SELECT e.id, e.title, e.description, e.date, e.time, e.location, e.category,
           e.banner_url, e.organizer_id, e.created_at,
           u.name AS organizer_name, u.email AS organizer_email,
           u.bio AS organizer_bio, u.avatar_url AS organizer_avatar_url,
           u.created_at AS organizer_created_at,
           (SELECT COUNT(*) FROM rsvps r
             WHERE r.event_id = e.id AND r.status = 'yes') AS rsvp_count,
           (SELECT r.status FROM rsvps r
             WHERE r.event_id = e.id AND r.user_id = $1) AS rsvp_status
    FROM events e
    JOIN users u ON u.id = e.organizer_id
"#;

/// Event repository
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new event repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an event for the given organizer
    pub async fn create(&self, organizer_id: Uuid, event: &CreateEvent) -> ApiResult<Event> {
        info!("Creating event '{}' for organizer {}", event.title, organizer_id);

        let created = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, date, time, location, category, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, date, time, location, category,
                      banner_url, organizer_id, created_at
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.category)
        .bind(organizer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Find an event by ID, undecorated
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, date, time, location, category,
                   banner_url, organizer_id, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Fetch a single decorated event
    pub async fn get_decorated(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> ApiResult<Option<EventResponse>> {
        let row = sqlx::query(&format!("{DECORATED_SELECT} WHERE e.id = $2"))
            .bind(viewer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(map_decorated_row))
    }

    /// List events with optional filters, ordered by ascending date
    pub async fn list(
        &self,
        city: Option<&str>,
        category: Option<&str>,
        date: Option<NaiveDate>,
        viewer: Option<Uuid>,
    ) -> ApiResult<Vec<EventResponse>> {
        let rows = sqlx::query(&format!(
            r#"
            {DECORATED_SELECT}
            WHERE ($2::text IS NULL OR e.location ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR e.category ILIKE '%' || $3 || '%')
              AND ($4::date IS NULL OR e.date = $4)
            ORDER BY e.date ASC, e.time ASC
            "#,
        ))
        .bind(viewer)
        .bind(city)
        .bind(category)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_decorated_row).collect())
    }

    /// Events organized by the given user
    pub async fn by_organizer(
        &self,
        organizer_id: Uuid,
        viewer: Option<Uuid>,
    ) -> ApiResult<Vec<EventResponse>> {
        let rows = sqlx::query(&format!(
            "{DECORATED_SELECT} WHERE e.organizer_id = $2 ORDER BY e.date ASC, e.time ASC"
        ))
        .bind(viewer)
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_decorated_row).collect())
    }

    /// Events the given user has RSVP'd to
    pub async fn registrations_for(&self, user_id: Uuid) -> ApiResult<Vec<EventResponse>> {
        let rows = sqlx::query(&format!(
            r#"
            {DECORATED_SELECT}
            JOIN rsvps mine ON mine.event_id = e.id AND mine.user_id = $1
            ORDER BY e.date ASC, e.time ASC
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_decorated_row).collect())
    }

    /// Apply a validated partial update; organizer-only, all-or-nothing
    ///
    /// The row is read and rewritten inside one transaction so a storage
    /// failure leaves no partial effects.
    pub async fn apply_update(
        &self,
        event_id: Uuid,
        caller_id: Uuid,
        update: &EventUpdate,
    ) -> ApiResult<Event> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, date, time, location, category,
                   banner_url, organizer_id, created_at
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("Event"))?;

        if event.organizer_id != caller_id {
            return Err(ApiError::Forbidden);
        }

        let title = update.title.as_deref().unwrap_or(&event.title);
        let description = match &update.description {
            Some(value) => value.as_deref(),
            None => event.description.as_deref(),
        };
        let location = update.location.as_deref().unwrap_or(&event.location);
        let category = match &update.category {
            Some(value) => value.as_deref(),
            None => event.category.as_deref(),
        };
        let date = update.date.unwrap_or(event.date);
        let time = update.time.as_deref().unwrap_or(&event.time);

        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = $1, description = $2, location = $3, category = $4,
                date = $5, time = $6
            WHERE id = $7
            RETURNING id, title, description, date, time, location, category,
                      banner_url, organizer_id, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(category)
        .bind(date)
        .bind(time)
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Updated event {}", event_id);
        Ok(updated)
    }

    /// Persist the banner URL for an event; organizer-only
    pub async fn set_banner(
        &self,
        event_id: Uuid,
        caller_id: Uuid,
        banner_url: &str,
    ) -> ApiResult<Event> {
        let event = self
            .find_by_id(event_id)
            .await?
            .ok_or(ApiError::NotFound("Event"))?;

        if event.organizer_id != caller_id {
            return Err(ApiError::Forbidden);
        }

        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET banner_url = $1
            WHERE id = $2
            RETURNING id, title, description, date, time, location, category,
                      banner_url, organizer_id, created_at
            "#,
        )
        .bind(banner_url)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }
}

fn map_decorated_row(row: PgRow) -> EventResponse {
    let rsvp_status: Option<String> = row.get("rsvp_status");

    EventResponse {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        date: row.get("date"),
        time: row.get("time"),
        location: row.get("location"),
        category: row.get("category"),
        banner_url: row.get("banner_url"),
        organizer: UserPublic {
            id: row.get("organizer_id"),
            name: row.get("organizer_name"),
            email: row.get("organizer_email"),
            bio: row.get("organizer_bio"),
            avatar_url: row.get("organizer_avatar_url"),
            created_at: row.get("organizer_created_at"),
        },
        created_at: row.get("created_at"),
        rsvp_count: row.get("rsvp_count"),
        rsvp_status: rsvp_status.and_then(|s| s.parse::<RsvpStatus>().ok()),
    }
}
