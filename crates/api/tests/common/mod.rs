#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chartgen_core::chart::REQUIRED_MODULES;
use chartgen_core::scripting::python::PythonExecutor;
use http_body_util::BodyExt;
use tower::ServiceExt;

use chartgen_api::config::ServerConfig;
use chartgen_api::router::build_app_router;
use chartgen_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5000".to_string()],
        request_timeout_secs: 60,
        python_bin: "python3".to_string(),
        execution_timeout_secs: 30,
        max_concurrent_renders: 2,
        max_code_bytes: 4096,
        chart_dpi: Some(50),
        json_logs: false,
    }
}

/// Build the full application router with all middleware layers.
pub async fn build_test_app() -> Router {
    build_app_with(test_config()).await
}

pub async fn build_app_with(config: ServerConfig) -> Router {
    let state = AppState::from_config(config.clone()).await;
    build_app_router(state, &config)
}

/// Whether `python3` can import matplotlib and numpy. Tests that need a
/// real interpreter return early when this is false.
pub async fn python_available() -> bool {
    match PythonExecutor::default()
        .check_imports(REQUIRED_MODULES, Duration::from_secs(30))
        .await
    {
        Ok(()) => true,
        Err(e) => {
            eprintln!("skipping: matplotlib/numpy unavailable ({e})");
            false
        }
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, "application/json", body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: String) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
