use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("No calendar connection found for this firm")]
    NotConnected,
    #[error("Calendar authentication expired: {0}")]
    NeedsReauth(String),
    #[error("Remote calendar unavailable: {0}")]
    CalendarUnavailable(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    // 2067 = SQLite Unique Constraint
                    if db_err.code().unwrap_or_default() == "2067" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)", "code": "conflict" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg.clone()),
            AppError::NotConnected => (
                StatusCode::CONFLICT,
                "not_connected",
                "No calendar connection found for this firm".to_string(),
            ),
            AppError::NeedsReauth(msg) => (
                StatusCode::CONFLICT,
                "needs_reauth",
                format!("Calendar authentication has expired. Please reconnect your calendar. ({})", msg),
            ),
            AppError::CalendarUnavailable(msg) => {
                error!("Remote calendar unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "calendar_unavailable",
                    "Remote calendar is unavailable. Please try again later.".to_string(),
                )
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal", "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
