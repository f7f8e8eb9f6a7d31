//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid session token
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated but not authorized for the target
    #[error("Forbidden")]
    Forbidden,

    /// Entity id unknown
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed or out-of-range field
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Duplicate name, membership, or RSVP
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    /// Build a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Machine-readable error kind included in every response body
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation { .. } => "validation_error",
            ApiError::Conflict(_) => "conflict",
            ApiError::InternalServerError | ApiError::Database(_) => "internal_error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal detail stays in the logs, never in the response body.
        let message = match &self {
            ApiError::InternalServerError | ApiError::Database(_) => {
                tracing::error!("Internal error: {}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut body = json!({
            "error": self.kind(),
            "message": message,
        });

        if let ApiError::Validation { field, .. } = &self {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(common::error::DatabaseError::Query(err))
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("Event").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("title", "must not be empty").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Conflict("Group name already exists".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(ApiError::NotFound("RSVP").kind(), "not_found");
        assert_eq!(
            ApiError::validation("date", "malformed").kind(),
            "validation_error"
        );
        assert_eq!(ApiError::InternalServerError.kind(), "internal_error");
    }
}
