// ABOUTME: Unified error type with stable error codes and HTTP response mapping
// ABOUTME: Covers auth, not-found, validation, conflict, plan-state, and database failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! Error handling
//!
//! Every fallible operation in the crate returns [`AppResult`]. Handlers return
//! the error directly; [`AppError`] renders itself as a JSON body of the form
//! `{"error": {"code", "message", "retryable"}}` with the status implied by
//! its [`ErrorCode`].

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Result alias used across the crate
pub type AppResult<T> = Result<T, AppError>;

/// Stable, client-facing error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No credentials were presented
    AuthRequired,
    /// Credentials were presented but are not valid
    AuthInvalid,
    /// Credentials have expired
    AuthExpired,
    /// Authenticated, but the role does not allow the action
    PermissionDenied,
    /// The requested record does not exist or is outside the caller's scope
    ResourceNotFound,
    /// A field failed validation
    InvalidInput,
    /// A required field was empty or missing
    MissingRequiredField,
    /// A value could not be parsed
    InvalidFormat,
    /// A concurrent or duplicate write was rejected
    ResourceConflict,
    /// The player has no active development plan
    NoActivePlan,
    /// The database rejected or failed an operation
    DatabaseError,
    /// Configuration is missing or invalid
    ConfigError,
    /// Unexpected internal failure
    InternalError,
}

impl ErrorCode {
    /// HTTP status returned for this code
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput | Self::MissingRequiredField | Self::InvalidFormat => {
                StatusCode::BAD_REQUEST
            }
            Self::ResourceConflict => StatusCode::CONFLICT,
            Self::NoActivePlan => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DatabaseError | Self::ConfigError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short human-readable description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication required",
            Self::AuthInvalid => "Invalid authentication",
            Self::AuthExpired => "Authentication expired",
            Self::PermissionDenied => "Permission denied",
            Self::ResourceNotFound => "Resource not found",
            Self::InvalidInput => "Invalid input",
            Self::MissingRequiredField => "Missing required field",
            Self::InvalidFormat => "Invalid format",
            Self::ResourceConflict => "Conflict",
            Self::NoActivePlan => "No active plan",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
            Self::InternalError => "Internal error",
        }
    }

    /// Whether the client may retry the same request after reloading state
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::ResourceConflict)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Application error carrying a code and a message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Stable error code
    pub code: ErrorCode,
    /// Human-readable message shown to the user
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Missing credentials
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid credentials
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Role does not permit the action
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Record absent or outside the caller's scope
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Validation failure
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field was empty
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{field} is required"),
        )
    }

    /// Duplicate or concurrent write
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceConflict, message)
    }

    /// Player has no active plan
    pub fn no_active_plan(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoActivePlan, message)
    }

    /// Database failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Unexpected failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Map a failed write, turning unique-constraint violations into conflicts
    pub fn from_write(context: &str, err: &sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = err {
            if db_err.is_unique_violation() {
                return Self::conflict(format!("{context}: record already exists"));
            }
            if db_err.is_foreign_key_violation() {
                return Self::invalid_input(format!("{context}: referenced record does not exist"));
            }
        }
        Self::database(format!("{context}: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Record"),
            other => Self::from_write("Database operation failed", &other),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorCode::InvalidFormat, format!("JSON error: {err}"))
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => {
                Self::new(ErrorCode::AuthExpired, "Token has expired")
            }
            _ => Self::auth_invalid(format!("Invalid token: {err}")),
        }
    }
}

/// Error payload body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Whether retrying after a reload may succeed
    pub retryable: bool,
}

/// Error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorBody,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            error: ErrorBody {
                code: err.code,
                message: err.message.clone(),
                retryable: err.code.is_retryable(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            error!(code = ?self.code, message = %self.message, "Request failed");
        } else {
            warn!(code = ?self.code, message = %self.message, "Request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
