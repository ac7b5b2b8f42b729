//! Chart renderer service.
//!
//! Owns the interpreter executor and the concurrency limit. Held in the API
//! state as an `Arc<ChartRenderer>`.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, ImageReader};
use serde_json::json;
use tokio::sync::Semaphore;

use super::report::{interpret, read_report, Verdict};
use super::{
    ChartError, ChartImage, ChartOutcome, CHART_FILE, HARNESS_FILE, HARNESS_SOURCE,
    MAX_CAPTURED_OUTPUT_CHARS, REPORT_FILE,
};
use crate::scripting::executor::{ScriptError, ScriptExecutor, ScriptInput};
use crate::scripting::python::PythonExecutor;

/// Tunables for [`ChartRenderer`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Wall-clock limit for one submission.
    pub timeout: Duration,
    /// Resolution passed to `savefig`; `None` keeps matplotlib's default.
    pub dpi: Option<u32>,
    /// Interpreter processes allowed to run at once.
    pub max_concurrent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            dpi: None,
            max_concurrent: 4,
        }
    }
}

/// Runs submissions through the harness and collects the chart.
pub struct ChartRenderer<E = PythonExecutor> {
    executor: E,
    options: RenderOptions,
    limiter: Arc<Semaphore>,
}

impl<E: ScriptExecutor> ChartRenderer<E> {
    pub fn new(executor: E, options: RenderOptions) -> Self {
        let limiter = Arc::new(Semaphore::new(options.max_concurrent.max(1)));
        Self {
            executor,
            options,
            limiter,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Execute `code` and produce an image, a message, or the error text.
    ///
    /// Waits for a free slot when `max_concurrent` submissions are already
    /// running. The scratch directory is removed when this returns.
    pub async fn render(&self, code: &str) -> Result<ChartOutcome, ChartError> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| ChartError::Unavailable)?;

        let scratch = tempfile::Builder::new().prefix("chartgen-").tempdir()?;
        let harness_path = scratch.path().join(HARNESS_FILE);
        let chart_path = scratch.path().join(CHART_FILE);
        let report_path = scratch.path().join(REPORT_FILE);
        tokio::fs::write(&harness_path, HARNESS_SOURCE).await?;

        let input = ScriptInput {
            data: json!({
                "code": code,
                "chart_path": path_arg(&chart_path)?,
                "report_path": path_arg(&report_path)?,
                "dpi": self.options.dpi,
                "max_output_chars": MAX_CAPTURED_OUTPUT_CHARS,
            }),
            env_vars: harness_env(),
            working_directory: Some(scratch.path().to_path_buf()),
            timeout: self.options.timeout,
        };

        let output = match self.executor.execute(&harness_path, input).await {
            Ok(output) => output,
            Err(ScriptError::Timeout { elapsed_ms }) => {
                return Err(ChartError::Timeout { elapsed_ms });
            }
            Err(e) => return Err(ChartError::Interpreter(e)),
        };

        let report = read_report(&report_path).await;
        let outcome = match interpret(report, &output) {
            Verdict::ChartReady => {
                let bytes = tokio::fs::read(&chart_path).await?;
                ChartOutcome::Image(encode_png(&bytes)?)
            }
            Verdict::Message(message) => ChartOutcome::Message(message),
            Verdict::Failed(text) => ChartOutcome::Failed(text),
        };

        match &outcome {
            ChartOutcome::Image(image) => tracing::info!(
                width = image.width,
                height = image.height,
                duration_ms = output.duration_ms,
                "Chart rendered"
            ),
            ChartOutcome::Message(_) => {
                tracing::info!(duration_ms = output.duration_ms, "Code ran without a figure")
            }
            ChartOutcome::Failed(_) => {
                tracing::info!(duration_ms = output.duration_ms, "Code raised an error")
            }
        }

        Ok(outcome)
    }
}

/// Environment for the harness process.
///
/// `MPLCONFIGDIR` is inherited from the server so the font cache is built
/// once, not per request.
fn harness_env() -> Vec<(String, String)> {
    vec![
        ("MPLBACKEND".to_string(), "Agg".to_string()),
        ("PYTHONIOENCODING".to_string(), "utf-8".to_string()),
        ("PYTHONDONTWRITEBYTECODE".to_string(), "1".to_string()),
    ]
}

/// Scratch paths travel to the harness as JSON strings.
fn path_arg(path: &Path) -> Result<&str, ChartError> {
    path.to_str().ok_or_else(|| {
        ChartError::Io(std::io::Error::other(format!(
            "scratch path is not valid UTF-8: {}",
            path.display()
        )))
    })
}

/// Check the PNG header and base64-encode the bytes.
fn encode_png(bytes: &[u8]) -> Result<ChartImage, ChartError> {
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), ImageFormat::Png)
        .into_dimensions()
        .map_err(|e| ChartError::InvalidImage(e.to_string()))?;

    Ok(ChartImage {
        base64: STANDARD.encode(bytes),
        width,
        height,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
