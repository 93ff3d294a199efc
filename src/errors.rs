//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion into the
//! `{success, message, errors?}` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    InvalidCredentials(String),

    // Resource errors
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidFields(Vec<FieldError>),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Image storage error: {0}")]
    Storage(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials(_) | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_)
            | AppError::Validation(_)
            | AppError::InvalidFields(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Storage(msg) => {
                tracing::error!("Image storage error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.user_message();
        let errors = match self {
            AppError::InvalidFields(errors) => Some(errors),
            _ => None,
        };
        let body = ErrorResponse {
            success: false,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

/// Flatten validator output into field errors, sorted by field name.
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidFields(field_errors(&errors))
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, what: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, what: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(what))
    }
}

/// Convenience constructors
impl AppError {
    /// `"<what> not found"`
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }

    /// Ownership-scoped lookup miss; never reveals whether the row exists.
    pub fn not_found_or_denied(what: &str) -> Self {
        AppError::NotFound(format!("{} not found or access denied", what))
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn invalid_credentials(msg: impl Into<String>) -> Self {
        AppError::InvalidCredentials(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        AppError::Storage(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
