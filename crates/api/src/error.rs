use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pulsewatch_core::CoreError;
use pulsewatch_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pulsewatch-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The pulse store rejected an operation.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body was not parseable JSON. Per the device contract
    /// this is a server-error response, not a 4xx.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, json!({ "error": msg }))
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "error": "An internal error occurred" }),
                    )
                }
            },

            AppError::Store(err) => {
                tracing::error!(error = %err, "Pulse store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Failed to save pulse",
                        "details": err.to_string(),
                    }),
                )
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),

            AppError::MalformedBody(msg) => {
                tracing::error!(error = %msg, "Unparseable request body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Failed to parse request body",
                        "details": msg,
                    }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
