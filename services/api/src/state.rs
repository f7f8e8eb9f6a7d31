//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{EventRepository, GroupRepository, RsvpRepository, UserRepository};
use crate::storage::BannerStorage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub group_repository: GroupRepository,
    pub event_repository: EventRepository,
    pub rsvp_repository: RsvpRepository,
    pub banner_storage: BannerStorage,
}
