use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chart;
use crate::state::AppState;

/// Mount the editor page.
pub fn page_router() -> Router<AppState> {
    Router::new().route("/", get(chart::index))
}

/// Mount the chart generation endpoint.
///
/// Kept outside the HTTP request timeout: a submission is bounded by the
/// execution timeout once it runs, and may first wait for a render slot.
pub fn generate_router() -> Router<AppState> {
    Router::new().route("/generate-chart", post(chart::generate_chart))
}
