use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chartgen_core::chart::ChartError;
use chartgen_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`ChartError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// `{"error", "code"}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `chartgen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The renderer could not complete a run.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Submitted code raised; holds the full traceback text.
    #[error("{0}")]
    Execution(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            AppError::Chart(chart) => match chart {
                ChartError::Timeout { .. } => (
                    StatusCode::BAD_REQUEST,
                    "EXECUTION_TIMEOUT",
                    chart.to_string(),
                ),
                other => {
                    tracing::error!(error = %other, "Chart renderer error");
                    internal()
                }
            },

            AppError::Execution(text) => (StatusCode::BAD_REQUEST, "EXECUTION_ERROR", text.clone()),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
