//! Group repository for database operations

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateGroup, Group, GroupMember, UpdateGroup, UserPublic};

const GROUP_COLUMNS: &str = "id, name, description, avatar_url, owner_id, created_at";

/// Group repository
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Create a new group repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a group and enroll the owner as its first member
    ///
    /// Both inserts run in one transaction; a duplicate name maps to
    /// `Conflict` with no row created.
    pub async fn create(&self, owner_id: Uuid, new_group: &CreateGroup) -> ApiResult<Group> {
        info!("Creating group {} for owner {}", new_group.name, owner_id);

        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, Group>(&format!(
            r#"
            INSERT INTO groups (name, description, avatar_url, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {GROUP_COLUMNS}
            "#,
        ))
        .bind(&new_group.name)
        .bind(&new_group.description)
        .bind(&new_group.avatar_url)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::Conflict("Group name already exists".to_string())
            }
            _ => e.into(),
        })?;

        sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
            .bind(group.id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(group)
    }

    /// Join a group; joining twice is an idempotent success
    pub async fn join(&self, group_id: Uuid, user_id: Uuid) -> ApiResult<GroupMember> {
        if self.find_by_id(group_id).await?.is_none() {
            return Err(ApiError::NotFound("Group"));
        }

        // The unique constraint on (group_id, user_id) closes the
        // check-then-insert race; a conflicting insert returns no row and we
        // hand back the existing membership instead.
        let inserted = sqlx::query_as::<_, GroupMember>(
            r#"
            INSERT INTO group_members (group_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (group_id, user_id) DO NOTHING
            RETURNING id, group_id, user_id, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(member) = inserted {
            return Ok(member);
        }

        let existing = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT id, group_id, user_id, joined_at
            FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        existing.ok_or(ApiError::InternalServerError)
    }

    /// Get all groups
    pub async fn get_all(&self) -> ApiResult<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM groups ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Find a group by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM groups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Groups the user has joined, via the membership join
    pub async fn groups_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT g.id, g.name, g.description, g.avatar_url, g.owner_id, g.created_at
            FROM groups g
            JOIN group_members gm ON gm.group_id = g.id
            WHERE gm.user_id = $1
            ORDER BY gm.joined_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Member public profiles for a group
    pub async fn members(&self, group_id: Uuid) -> ApiResult<Vec<UserPublic>> {
        if self.find_by_id(group_id).await?.is_none() {
            return Err(ApiError::NotFound("Group"));
        }

        let members = sqlx::query_as::<_, UserPublicRow>(
            r#"
            SELECT u.id, u.name, u.email, u.bio, u.avatar_url, u.created_at
            FROM group_members gm
            JOIN users u ON u.id = gm.user_id
            WHERE gm.group_id = $1
            ORDER BY gm.joined_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members.into_iter().map(UserPublicRow::into_public).collect())
    }

    /// Update a group's mutable fields; owner-only
    pub async fn update(
        &self,
        group_id: Uuid,
        caller_id: Uuid,
        changes: &UpdateGroup,
    ) -> ApiResult<Group> {
        let group = self
            .find_by_id(group_id)
            .await?
            .ok_or(ApiError::NotFound("Group"))?;

        if group.owner_id != caller_id {
            return Err(ApiError::Forbidden);
        }

        let name = changes.name.as_deref().unwrap_or(&group.name);
        // Some(None) clears the column, None keeps the stored value.
        let description = match &changes.description {
            Some(value) => value.as_deref(),
            None => group.description.as_deref(),
        };
        let avatar_url = match &changes.avatar_url {
            Some(value) => value.as_deref(),
            None => group.avatar_url.as_deref(),
        };

        let updated = sqlx::query_as::<_, Group>(&format!(
            r#"
            UPDATE groups
            SET name = $1, description = $2, avatar_url = $3
            WHERE id = $4
            RETURNING {GROUP_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(description)
        .bind(avatar_url)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::Conflict("Group name already exists".to_string())
            }
            _ => e.into(),
        })?;

        Ok(updated)
    }

    /// Delete a group; owner-only, membership rows cascade
    pub async fn delete(&self, group_id: Uuid, caller_id: Uuid) -> ApiResult<()> {
        let group = self
            .find_by_id(group_id)
            .await?
            .ok_or(ApiError::NotFound("Group"))?;

        if group.owner_id != caller_id {
            return Err(ApiError::Forbidden);
        }

        info!("Deleting group {}", group_id);
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserPublicRow {
    id: Uuid,
    name: String,
    email: String,
    bio: Option<String>,
    avatar_url: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl UserPublicRow {
    fn into_public(self) -> UserPublic {
        UserPublic {
            id: self.id,
            name: self.name,
            email: self.email,
            bio: self.bio,
            avatar_url: self.avatar_url,
            created_at: self.created_at,
        }
    }
}
