//! Editor page and chart generation handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use chartgen_core::chart::{self, ChartOutcome};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /generate-chart`.
#[derive(Debug, Deserialize)]
pub struct GenerateChartRequest {
    /// Plotting source to execute. Missing is treated as empty.
    #[serde(default)]
    pub code: String,
}

/// Successful `POST /generate-chart` body: `{"image": ...}` or `{"message": ...}`.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerateChartResponse {
    /// Base64-encoded PNG.
    Image(String),
    /// Captured output when no figure was produced.
    Message(String),
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /generate-chart
///
/// Runs the submitted code and returns the active figure as a PNG, the
/// captured output when there is no figure, or the traceback with 400.
pub async fn generate_chart(
    State(state): State<AppState>,
    payload: Result<Json<GenerateChartRequest>, JsonRejection>,
) -> AppResult<Json<GenerateChartResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    chart::validate_code(&request.code, state.config.max_code_bytes)?;
    tracing::debug!(code_bytes = request.code.len(), "Generating chart");

    match state.renderer.render(&request.code).await? {
        ChartOutcome::Image(image) => Ok(Json(GenerateChartResponse::Image(image.base64))),
        ChartOutcome::Message(message) => Ok(Json(GenerateChartResponse::Message(message))),
        ChartOutcome::Failed(text) => Err(AppError::Execution(text)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_variants_serialize_as_single_field() {
        let image = serde_json::to_value(GenerateChartResponse::Image("iVBOR".into())).unwrap();
        assert_eq!(image, serde_json::json!({"image": "iVBOR"}));

        let message = serde_json::to_value(GenerateChartResponse::Message("hi".into())).unwrap();
        assert_eq!(message, serde_json::json!({"message": "hi"}));
    }

    #[test]
    fn missing_code_defaults_to_empty() {
        let request: GenerateChartRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.code, "");
    }

    #[test]
    fn index_page_posts_to_generate_chart() {
        assert!(INDEX_HTML.contains("/generate-chart"));
        assert!(INDEX_HTML.contains("<textarea"));
    }
}
