//! Group routes: creation, membership, listings

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{CreateGroup, Group, UpdateGroup, UserPublic};
use crate::state::AppState;
use crate::validation;

/// Create a group owned by the caller; the owner joins automatically
pub async fn create_group(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateGroup>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_name(&payload.name)
        .map_err(|message| ApiError::validation("name", message))?;

    let payload = CreateGroup {
        name: payload.name.trim().to_string(),
        ..payload
    };

    let group = state.group_repository.create(user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// Join a group; joining twice is an idempotent success
pub async fn join_group(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let member = state.group_repository.join(group_id, user.id).await?;
    Ok(Json(member))
}

/// Groups the caller has joined
pub async fn my_groups(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Group>>> {
    let groups = state.group_repository.groups_for_user(user.id).await?;
    Ok(Json(groups))
}

/// Get all groups
pub async fn get_all_groups(State(state): State<AppState>) -> ApiResult<Json<Vec<Group>>> {
    let groups = state.group_repository.get_all().await?;
    Ok(Json(groups))
}

/// Get a specific group by ID
pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> ApiResult<Json<Group>> {
    let group = state
        .group_repository
        .find_by_id(group_id)
        .await?
        .ok_or(ApiError::NotFound("Group"))?;

    Ok(Json(group))
}

/// Member profiles for a group
pub async fn group_members(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> ApiResult<Json<Vec<UserPublic>>> {
    let members = state.group_repository.members(group_id).await?;
    Ok(Json(members))
}

/// Edit a group; owner-only
pub async fn update_group(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<UpdateGroup>,
) -> ApiResult<Json<Group>> {
    if let Some(name) = &payload.name {
        validation::validate_name(name)
            .map_err(|message| ApiError::validation("name", message))?;
    }

    let UpdateGroup {
        name,
        description,
        avatar_url,
    } = payload;
    let payload = UpdateGroup {
        name: name.map(|n| n.trim().to_string()),
        description,
        avatar_url,
    };

    let group = state
        .group_repository
        .update(group_id, user.id, &payload)
        .await?;

    Ok(Json(group))
}

/// Delete a group; owner-only, memberships cascade
pub async fn delete_group(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.group_repository.delete(group_id, user.id).await?;
    Ok(Json(json!({"success": true})))
}
