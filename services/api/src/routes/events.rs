//! Event routes: CRUD, RSVPs, banner upload, organizer views

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, OptionalAuthUser};
use crate::models::{CreateEvent, EventFilters, EventResponse, RsvpRequest, RsvpStatus};
use crate::state::AppState;
use crate::storage::extension_for;
use crate::validation;

const MAX_BANNER_BYTES: usize = 5 * 1024 * 1024;

/// Create an event organized by the caller
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut payload): Json<CreateEvent>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_new_event(&mut payload)?;

    let event = state.event_repository.create(user.id, &payload).await?;
    let response = decorated(&state, event.id, Some(user.id)).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List events, optionally filtered by city, category, and date
pub async fn list_events(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Query(filters): Query<EventFilters>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let date = filters
        .date
        .as_deref()
        .map(validation::parse_date)
        .transpose()
        .map_err(|message| ApiError::validation("date", message))?;

    let events = state
        .event_repository
        .list(
            filters.city.as_deref(),
            filters.category.as_deref(),
            date,
            viewer.map(|u| u.id),
        )
        .await?;

    Ok(Json(events))
}

/// Event detail with RSVP aggregate
pub async fn get_event(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Json<EventResponse>> {
    let event = decorated(&state, event_id, viewer.map(|u| u.id)).await?;
    Ok(Json(event))
}

/// Partial update; organizer-only, all-or-nothing
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
    Json(fields): Json<Map<String, Value>>,
) -> ApiResult<Json<EventResponse>> {
    let today = Utc::now().date_naive();
    let update = validation::parse_event_update(&fields, today)?;

    state
        .event_repository
        .apply_update(event_id, user.id, &update)
        .await?;

    let event = decorated(&state, event_id, Some(user.id)).await?;
    Ok(Json(event))
}

/// Upload a banner image; organizer-only
pub async fn upload_banner(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<EventResponse>> {
    // Ownership is checked before the upload so a non-organizer never
    // reaches the storage backend.
    let event = state
        .event_repository
        .find_by_id(event_id)
        .await?
        .ok_or(ApiError::NotFound("Event"))?;

    if event.organizer_id != user.id {
        return Err(ApiError::Forbidden);
    }

    let field = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("file", "malformed multipart body"))?
        .ok_or_else(|| ApiError::validation("file", "no file provided"))?;

    let content_type = field
        .content_type()
        .ok_or_else(|| ApiError::validation("file", "missing content type"))?
        .to_string();

    if !content_type.starts_with("image/") {
        return Err(ApiError::validation("file", "banner must be an image"));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|_| ApiError::validation("file", "failed to read upload"))?;

    if bytes.len() > MAX_BANNER_BYTES {
        return Err(ApiError::validation("file", "banner exceeds 5 MiB"));
    }

    let key = format!(
        "banners/{}-{}.{}",
        event_id,
        Uuid::new_v4(),
        extension_for(&content_type)
    );

    let banner_url = state
        .banner_storage
        .store(&key, &content_type, bytes.to_vec())
        .await
        .map_err(|e| {
            tracing::error!("Failed to store banner: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .event_repository
        .set_banner(event_id, user.id, &banner_url)
        .await?;

    info!("Stored banner for event {} at {}", event_id, banner_url);

    let event = decorated(&state, event_id, Some(user.id)).await?;
    Ok(Json(event))
}

/// Set the caller's RSVP; an empty body defaults the status to "yes"
pub async fn rsvp_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
    body: axum::body::Bytes,
) -> ApiResult<impl IntoResponse> {
    if state.event_repository.find_by_id(event_id).await?.is_none() {
        return Err(ApiError::NotFound("Event"));
    }

    let status = if body.is_empty() {
        RsvpStatus::Yes
    } else {
        serde_json::from_slice::<RsvpRequest>(&body)
            .map_err(|_| {
                ApiError::validation("status", "must be one of \"yes\", \"no\", \"maybe\"")
            })?
            .status
    };
    let rsvp = state
        .rsvp_repository
        .set_status(user.id, event_id, status)
        .await?;

    Ok(Json(rsvp))
}

/// Remove the caller's RSVP
pub async fn cancel_rsvp(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.rsvp_repository.clear(user.id, event_id).await?;
    Ok(Json(json!({"success": true})))
}

/// RSVP rosters grouped by status
pub async fn list_event_rsvps(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if state.event_repository.find_by_id(event_id).await?.is_none() {
        return Err(ApiError::NotFound("Event"));
    }

    let rosters = state.rsvp_repository.rosters(event_id).await?;
    let counts = state.rsvp_repository.counts_by_status(event_id).await?;

    let mut body = Map::new();
    for (status, users) in rosters {
        body.insert(status.as_str().to_string(), json!(users));
    }
    body.insert("counts".to_string(), json!(counts));

    Ok(Json(Value::Object(body)))
}

/// Events the caller has RSVP'd to
pub async fn my_registrations(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state.event_repository.registrations_for(user.id).await?;
    Ok(Json(events))
}

/// Events organized by the caller
pub async fn my_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state
        .event_repository
        .by_organizer(user.id, Some(user.id))
        .await?;
    Ok(Json(events))
}

/// Public profile of an organizer
pub async fn organizer_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("Organizer"))?;

    Ok(Json(user.public()))
}

async fn decorated(
    state: &AppState,
    event_id: Uuid,
    viewer: Option<Uuid>,
) -> ApiResult<EventResponse> {
    state
        .event_repository
        .get_decorated(event_id, viewer)
        .await?
        .ok_or(ApiError::NotFound("Event"))
}
