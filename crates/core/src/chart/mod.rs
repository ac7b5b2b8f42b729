//! Chart generation from submitted plotting code.
//!
//! A submission is run by the embedded Python [harness](HARNESS_SOURCE) in a
//! fresh interpreter process with its own scratch directory, so captured
//! output and figure state never leak between requests. The harness reports
//! what happened as JSON ([`report`]); the [`renderer`] turns that report and
//! the saved PNG into a [`ChartOutcome`].

pub mod renderer;
pub mod report;

use crate::error::CoreError;
use crate::scripting::executor::ScriptError;

pub use renderer::{ChartRenderer, RenderOptions};

/// Python driver program written into every scratch directory.
pub const HARNESS_SOURCE: &str = include_str!("harness.py");

/// File name of the harness inside the scratch directory.
pub const HARNESS_FILE: &str = "harness.py";

/// File name the harness saves the active figure to.
pub const CHART_FILE: &str = "chart.png";

/// File name the harness writes its JSON report to.
pub const REPORT_FILE: &str = "report.json";

/// Captured output kept per run, in characters; the rest is dropped.
pub const MAX_CAPTURED_OUTPUT_CHARS: usize = 10 * 1024 * 1024;

/// Appended by the harness after output cut at [`MAX_CAPTURED_OUTPUT_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n[output truncated]\n";

/// Prefix of the informational message returned when no figure exists.
///
/// Captured output is appended directly after it.
pub const NO_FIGURE_MESSAGE: &str = "No Matplotlib figure was created by your code.";

/// Modules the harness imports; checked at startup.
pub const REQUIRED_MODULES: &[&str] = &["matplotlib", "numpy"];

/// A rendered chart ready to embed in a JSON response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    /// Base64 (standard alphabet, padded) PNG bytes.
    pub base64: String,
    pub width: u32,
    pub height: u32,
}

/// Result of running one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutcome {
    /// At least one figure existed; the active one was saved.
    Image(ChartImage),
    /// The code ran cleanly but produced no figure.
    Message(String),
    /// The code raised, or the interpreter died. Holds the full error text.
    Failed(String),
}

/// Failures that are not attributable to the submitted code.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Execution timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("Interpreter error: {0}")]
    Interpreter(#[from] ScriptError),

    #[error("Scratch directory error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Harness produced an unreadable chart: {0}")]
    InvalidImage(String),

    #[error("Renderer is shutting down")]
    Unavailable,
}

/// Reject submissions larger than `max_bytes`.
pub fn validate_code(code: &str, max_bytes: usize) -> Result<(), CoreError> {
    if code.len() > max_bytes {
        return Err(CoreError::Validation(format!(
            "code is {} bytes, limit is {max_bytes}",
            code.len()
        )));
    }
    Ok(())
}
