use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::Error as SqlxError;

use crate::app::agent::ToolError;
use crate::app::rbac::RbacError;

/// Application error type for unified error handling across the app.
#[derive(Debug)]
pub enum AppError {
    /// Validation errors (400 Bad Request) - invalid input data
    Validation(String),

    /// Authentication errors (401 Unauthorized) - unknown email, etc.
    Auth(String),

    /// No valid session (401 Unauthorized)
    Unauthorized,

    /// Authenticated but the organization relationship does not grant the action (403 Forbidden).
    /// The body never names the relationship.
    Forbidden,

    /// Resource not found (404 Not Found)
    NotFound(String),

    /// The organization tree is corrupt (500 Internal Server Error)
    MalformedTree(String),

    /// Database errors (500 Internal Server Error)
    Database(SqlxError),

    /// Generic internal errors (500 Internal Server Error)
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Not permitted".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::MalformedTree(detail) => {
                tracing::error!(%detail, "malformed organization tree");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!(%err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<RbacError> for AppError {
    fn from(err: RbacError) -> Self {
        match err {
            RbacError::NotFound { kind, .. } => {
                AppError::NotFound(format!("{} not found", capitalize(kind)))
            }
            RbacError::MalformedTree { .. } => AppError::MalformedTree(err.to_string()),
            RbacError::Store(e) => AppError::Database(e),
        }
    }
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::CallerNotConfigured | ToolError::UserNotFound(_) => AppError::Unauthorized,
            ToolError::OrganizationNotFound(_) => {
                AppError::NotFound("Organization not found".to_string())
            }
            ToolError::GoalNotFound(_) => AppError::NotFound("Goal not found".to_string()),
            ToolError::PermissionDenied { .. } => AppError::Forbidden,
            ToolError::Validation(msg) => AppError::Validation(msg),
            ToolError::Rbac(e) => e.into(),
            ToolError::Database(e) => AppError::Database(e),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
