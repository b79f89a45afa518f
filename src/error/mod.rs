//! Centralized API error handling for FinBoard
//!
//! Every handler failure is converted here into the uniform response
//! envelope; nothing reaches the transport layer unconverted. Password and
//! hash material never appears in error messages.

use axum::extract::rejection::JsonRejection;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::AuthError;
use crate::models::ApiResponse;
use crate::store::StoreError;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Too many requests")]
    TooManyRequests,

    #[error("{0}")]
    Internal(String),

    #[error("Database error")]
    Database(String),
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-class details are logged, never sent to the client
        let message = match &self {
            ApiError::Database(detail) => {
                tracing::error!(error = %detail, "Database error");
                "Something went wrong".to_string()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal error");
                message.clone()
            }
            other => {
                tracing::debug!(error = %other, status = %status.as_u16(), "Request failed");
                other.to_string()
            }
        };

        let body = ApiResponse::<serde_json::Value> {
            status_code: status.as_u16(),
            data: None,
            message,
            success: false,
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::Validation(err.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => {
                ApiError::Conflict("User with this email already exists".to_string())
            }
            StoreError::Database(detail) => ApiError::Database(detail),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(message) => ApiError::Validation(message),
            AuthError::EmailTaken => {
                ApiError::Conflict("User with this email already exists".to_string())
            }
            AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::MissingRefreshToken => {
                ApiError::Unauthorized("Unauthorized request".to_string())
            }
            AuthError::InvalidRefreshToken(_) => {
                ApiError::Unauthorized("Invalid or expired refresh token".to_string())
            }
            AuthError::StaleRefreshToken => {
                ApiError::Unauthorized("Refresh token is expired or used".to_string())
            }
            AuthError::TokenIssue(_) => {
                ApiError::Internal("Something went wrong while generating tokens".to_string())
            }
            // Never surface hashing details
            AuthError::Hash(_) => ApiError::Internal("Something went wrong".to_string()),
            AuthError::Store(store) => store.into(),
            AuthError::Notification(_) => {
                ApiError::Internal("Registration email could not be sent".to_string())
            }
        }
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;
