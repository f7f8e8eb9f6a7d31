//! RSVP repository for database operations

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Rsvp, RsvpCounts, RsvpStatus, UserSummary};

/// RSVP repository
#[derive(Clone)]
pub struct RsvpRepository {
    pool: PgPool,
}

impl RsvpRepository {
    /// Create a new RSVP repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Set the caller's RSVP status for an event
    ///
    /// Upserts on (user_id, event_id): exactly one row per pair survives,
    /// carrying the most recent status.
    pub async fn set_status(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        status: RsvpStatus,
    ) -> ApiResult<Rsvp> {
        info!("Setting RSVP {} for user {} on event {}", status, user_id, event_id);

        let row = sqlx::query(
            r#"
            INSERT INTO rsvps (user_id, event_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, event_id) DO UPDATE SET status = EXCLUDED.status
            RETURNING id, user_id, event_id, status, created_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        map_rsvp_row(row)
    }

    /// Remove the caller's RSVP for an event
    pub async fn clear(&self, user_id: Uuid, event_id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM rsvps WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("RSVP"));
        }

        Ok(())
    }

    /// Count RSVPs per status for an event
    pub async fn counts_by_status(&self, event_id: Uuid) -> ApiResult<RsvpCounts> {
        let rows = sqlx::query(
            r#"
            SELECT status, COUNT(*) AS count
            FROM rsvps
            WHERE event_id = $1
            GROUP BY status
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = RsvpCounts::default();
        for row in rows {
            let status: String = row.get("status");
            let count: i64 = row.get("count");
            match status.parse::<RsvpStatus>() {
                Ok(RsvpStatus::Yes) => counts.yes = count,
                Ok(RsvpStatus::No) => counts.no = count,
                Ok(RsvpStatus::Maybe) => counts.maybe = count,
                Err(_) => {}
            }
        }

        Ok(counts)
    }

    /// Attendee rosters per status, ordered by RSVP creation
    pub async fn rosters(
        &self,
        event_id: Uuid,
    ) -> ApiResult<Vec<(RsvpStatus, Vec<UserSummary>)>> {
        let rows = sqlx::query(
            r#"
            SELECT r.status, u.id, u.name, u.email
            FROM rsvps r
            JOIN users u ON u.id = r.user_id
            WHERE r.event_id = $1
            ORDER BY r.created_at
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let mut rosters: Vec<(RsvpStatus, Vec<UserSummary>)> = RsvpStatus::ALL
            .into_iter()
            .map(|status| (status, Vec::new()))
            .collect();

        for row in rows {
            let status: String = row.get("status");
            let Ok(status) = status.parse::<RsvpStatus>() else {
                continue;
            };
            let user = UserSummary {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
            };
            if let Some((_, users)) = rosters.iter_mut().find(|(s, _)| *s == status) {
                users.push(user);
            }
        }

        Ok(rosters)
    }
}

fn map_rsvp_row(row: PgRow) -> ApiResult<Rsvp> {
    let status: String = row.get("status");
    let status = status.parse::<RsvpStatus>().map_err(|e| {
        tracing::error!("Invalid RSVP status in storage: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Rsvp {
        id: row.get("id"),
        user_id: row.get("user_id"),
        event_id: row.get("event_id"),
        status,
        created_at: row.get("created_at"),
    })
}
