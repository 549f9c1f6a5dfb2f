// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Exchanging the refresh token for an access token failed.
    #[error("Strava authentication failed: {0}")]
    Auth(String),

    /// A Strava list/detail call failed, timed out, or returned a non-success status.
    #[error("Strava API unavailable: {0}")]
    SourceUnavailable(String),

    /// Strava answered, but not with the shape we expect.
    #[error("Malformed Strava response: {0}")]
    MalformedResponse(String),

    /// The row store rejected an upsert.
    #[error("Failed to persist activity {activity_id}: {message}")]
    Persistence { activity_id: u64, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a persistence error for the given activity.
    pub fn persistence(activity_id: u64, message: impl Into<String>) -> Self {
        AppError::Persistence {
            activity_id,
            message: message.into(),
        }
    }

    /// Short machine-readable code used in response bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "auth_error",
            AppError::SourceUnavailable(_) => "strava_error",
            AppError::MalformedResponse(_) => "malformed_response",
            AppError::Persistence { .. } => "persistence_error",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            AppError::Auth(msg) => (StatusCode::BAD_GATEWAY, Some(msg.clone())),
            AppError::SourceUnavailable(msg) | AppError::MalformedResponse(msg) => {
                (StatusCode::BAD_GATEWAY, Some(msg.clone()))
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, None),
            AppError::Persistence {
                activity_id,
                message,
            } => {
                tracing::error!(activity_id, error = %message, "Persistence error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
