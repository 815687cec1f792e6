//! Error handling for the FarmLink platform
//!
//! Every failure is answered with `{ "success": false, "code", "message" }`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Authentication errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Too many failed login attempts")]
    TooManyAttempts,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // External service errors
    #[error("Upstream service error ({service}): {message}")]
    Upstream { service: String, message: String },

    #[error("Cache store error: {0}")]
    Cache(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(service: &str, message: impl Into<String>) -> Self {
        AppError::Upstream {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Report a unique-index violation as `Conflict`. Other database errors
    /// stay database errors.
    pub fn on_unique_violation(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return AppError::Conflict(message.to_string());
            }
        }
        AppError::DatabaseError(err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Cache(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::Cache(_) => "CACHE_UNAVAILABLE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound(resource) => format!("{} not found.", resource),
            AppError::TooManyAttempts => {
                "Too many failed login attempts. Try again later.".to_string()
            }
            AppError::Upstream { service, .. } => {
                format!("Failed to fetch {}. Please try again later.", service)
            }
            AppError::Cache(_) => "Service temporarily unavailable.".to_string(),
            AppError::DatabaseError(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                "Internal Server Error.".to_string()
            }
        }
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = ErrorResponse::new(self.code(), self.public_message());
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;

    #[derive(Debug)]
    struct PgError {
        code: &'static str,
    }

    impl std::fmt::Display for PgError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "postgres error {}", self.code)
        }
    }

    impl std::error::Error for PgError {}

    impl DatabaseError for PgError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.code {
                "23505" => ErrorKind::UniqueViolation,
                "23503" => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    #[test]
    fn unique_violation_becomes_conflict() {
        let err = sqlx::Error::Database(Box::new(PgError { code: "23505" }));
        let err = AppError::on_unique_violation(err, "User already exists");

        assert!(matches!(&err, AppError::Conflict(msg) if msg == "User already exists"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_database_errors_are_kept() {
        let err = sqlx::Error::Database(Box::new(PgError { code: "23503" }));
        assert!(matches!(
            AppError::on_unique_violation(err, "User already exists"),
            AppError::DatabaseError(_)
        ));

        assert!(matches!(
            AppError::on_unique_violation(sqlx::Error::RowNotFound, "User already exists"),
            AppError::DatabaseError(_)
        ));
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("Farmland".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::TooManyAttempts.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::upstream("weather data", "timeout").status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = AppError::Internal("connection string leaked".into());
        assert_eq!(err.public_message(), "Internal Server Error.");

        let err = AppError::upstream("crop recommendation", "401 invalid api key");
        assert!(!err.public_message().contains("api key"));
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(
            AppError::NotFound("Farmland".into()).public_message(),
            "Farmland not found."
        );
    }
}
