use std::sync::Arc;
use std::time::Duration;

use chartgen_core::chart::{ChartRenderer, REQUIRED_MODULES};
use chartgen_core::scripting::python::PythonExecutor;

use crate::config::ServerConfig;

/// How long the startup import check may take.
const IMPORT_CHECK_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Runs submissions in per-request interpreter processes.
    pub renderer: Arc<ChartRenderer>,
    /// Whether the interpreter imported the plotting modules at startup.
    pub python_ready: bool,
}

impl AppState {
    /// Build the state and its renderer from `config`, checking once that the
    /// interpreter can import the plotting modules.
    ///
    /// A failed check is not fatal: `/health` reports degraded and each
    /// submission returns the interpreter's error text.
    pub async fn from_config(config: ServerConfig) -> Self {
        let executor = PythonExecutor::new(config.python_bin.clone());

        let python_ready = match executor
            .check_imports(REQUIRED_MODULES, IMPORT_CHECK_TIMEOUT)
            .await
        {
            Ok(()) => {
                tracing::info!(python = %config.python_bin, "Interpreter imports plotting modules");
                true
            }
            Err(e) => {
                tracing::warn!(
                    python = %config.python_bin,
                    error = %e,
                    "Interpreter check failed; chart generation will not work"
                );
                false
            }
        };

        let renderer = ChartRenderer::new(executor, config.render_options());
        Self {
            config: Arc::new(config),
            renderer: Arc::new(renderer),
            python_ready,
        }
    }
}
