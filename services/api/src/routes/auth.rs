//! Registration and login routes

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{LoginRequest, NewUser, UserPublic};
use crate::state::AppState;
use crate::validation;

/// Response for a successful login
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserPublic,
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_name(&payload.name)
        .map_err(|message| ApiError::validation("name", message))?;
    validation::validate_email(&payload.email)
        .map_err(|message| ApiError::validation("email", message))?;
    validation::validate_password(&payload.password)
        .map_err(|message| ApiError::validation("password", message))?;

    let payload = NewUser {
        name: payload.name.trim().to_string(),
        ..payload
    };

    let user = state.user_repository.create(&payload).await?;
    info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(user.public())))
}

/// Log in and issue a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for {}", payload.email);

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    if !user.is_active {
        return Err(ApiError::Unauthenticated);
    }

    if !state.user_repository.verify_password(&user, &payload.password)? {
        return Err(ApiError::Unauthenticated);
    }

    state.user_repository.touch_last_login(user.id).await?;

    let access_token = state.jwt_service.generate_access_token(&user).map_err(|e| {
        tracing::error!("Failed to generate access token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
        user: user.public(),
    }))
}
