use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinedash_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cinedash_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route matched the request.
    #[error("Unknown endpoint")]
    UnknownEndpoint,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            AppError::UnknownEndpoint => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "unknown endpoint".to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - Check constraint violations (`23514`) map to 400; they mean input slipped
///   past domain validation.
/// - Everything else maps to 500 with a sanitized message; the detail is
///   only logged.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23514") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Value violates check constraint: {constraint}"),
            );
        }
    }

    tracing::error!(error = %err, "Database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
