use std::time::Duration;

use chartgen_core::chart::RenderOptions;
use chartgen_core::scripting::python::DEFAULT_PYTHON_BIN;

/// Configuration values that load but cannot work together.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "REQUEST_TIMEOUT_SECS ({request}) must be greater than EXECUTION_TIMEOUT_SECS ({execution})"
    )]
    RequestTimeoutTooShort { request: u64, execution: u64 },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Interpreter used to run submissions (default: `python3`).
    pub python_bin: String,
    /// Per-submission execution limit in seconds (default: `20`).
    pub execution_timeout_secs: u64,
    /// Interpreter processes allowed at once (default: `4`).
    pub max_concurrent_renders: usize,
    /// Largest accepted `code` field in bytes (default: `262144`).
    pub max_code_bytes: usize,
    /// `savefig` resolution; unset keeps matplotlib's default.
    pub chart_dpi: Option<u32>,
    /// Emit logs as JSON lines when `LOG_FORMAT=json`.
    pub json_logs: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `5000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5000` |
    /// | `REQUEST_TIMEOUT_SECS`   | `60`                    |
    /// | `PYTHON_BIN`             | `python3`               |
    /// | `EXECUTION_TIMEOUT_SECS` | `20`                    |
    /// | `MAX_CONCURRENT_RENDERS` | `4`                     |
    /// | `MAX_CODE_BYTES`         | `262144`                |
    /// | `CHART_DPI`              | unset                   |
    /// | `LOG_FORMAT`             | `text`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let python_bin = std::env::var("PYTHON_BIN").unwrap_or_else(|_| DEFAULT_PYTHON_BIN.into());

        let execution_timeout_secs: u64 = std::env::var("EXECUTION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("EXECUTION_TIMEOUT_SECS must be a valid u64");

        let max_concurrent_renders: usize = std::env::var("MAX_CONCURRENT_RENDERS")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("MAX_CONCURRENT_RENDERS must be a valid usize");

        let max_code_bytes: usize = std::env::var("MAX_CODE_BYTES")
            .unwrap_or_else(|_| "262144".into())
            .parse()
            .expect("MAX_CODE_BYTES must be a valid usize");

        let chart_dpi: Option<u32> = std::env::var("CHART_DPI")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse().expect("CHART_DPI must be a valid u32"));

        let json_logs = std::env::var("LOG_FORMAT")
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            python_bin,
            execution_timeout_secs,
            max_concurrent_renders,
            max_code_bytes,
            chart_dpi,
            json_logs,
        }
    }

    /// Check cross-field constraints.
    ///
    /// The request timeout guards the page and health routes; it must leave
    /// room for a full execution so those limits stay consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs <= self.execution_timeout_secs {
            return Err(ConfigError::RequestTimeoutTooShort {
                request: self.request_timeout_secs,
                execution: self.execution_timeout_secs,
            });
        }
        Ok(())
    }

    /// Renderer settings derived from this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            timeout: Duration::from_secs(self.execution_timeout_secs),
            dpi: self.chart_dpi,
            max_concurrent: self.max_concurrent_renders,
        }
    }
}
