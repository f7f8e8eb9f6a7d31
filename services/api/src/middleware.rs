//! Caller identity extraction from bearer tokens
//!
//! `AuthUser` rejects with `Unauthenticated` when the Authorization header
//! is missing or invalid; `OptionalAuthUser` yields `None` instead, for
//! endpoints that are public but decorate their response for known callers.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderValue, header, request::Parts},
};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated caller identity
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

fn resolve(parts: &Parts, state: &AppState) -> Option<AuthUser> {
    let token = bearer_token(parts.headers.get(header::AUTHORIZATION))?;
    let claims = state.jwt_service.validate_token(token).ok()?;
    Some(AuthUser { id: claims.sub })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state).ok_or(ApiError::Unauthenticated)
    }
}

/// Optional caller identity
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(resolve(parts, state)))
    }
}
