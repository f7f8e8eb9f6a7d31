//! API service routes

pub mod auth;
pub mod events;
pub mod groups;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/my-registrations", get(events::my_registrations))
        .route("/events/organizers/me/events", get(events::my_events))
        .route("/events/organizers/:id", get(events::organizer_profile))
        .route("/events/:id", get(events::get_event).put(events::update_event))
        .route("/events/:id/upload", post(events::upload_banner))
        .route(
            "/events/:id/rsvp",
            post(events::rsvp_event).delete(events::cancel_rsvp),
        )
        .route("/events/:id/rsvps", get(events::list_event_rsvps))
        .route("/groups", get(groups::get_all_groups).post(groups::create_group))
        .route("/groups/my-groups", get(groups::my_groups))
        .route(
            "/groups/:id",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route("/groups/:id/join", post(groups::join_group))
        .route("/groups/:id/members", get(groups::group_members))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "api-service"
    }))
}
