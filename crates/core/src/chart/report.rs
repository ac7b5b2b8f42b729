//! Harness report parsing.
//!
//! The harness writes one JSON object to a report file in the scratch
//! directory; stdout and stderr of the process are left to whatever the
//! submission does at the descriptor level. A missing or malformed report
//! means the interpreter died before finishing (bad interpreter, missing
//! modules, killed by the OS); that is reported as a failure carrying stderr,
//! the same as an exception in user code.

use std::path::Path;

use serde::Deserialize;

use super::NO_FIGURE_MESSAGE;
use crate::scripting::executor::ScriptOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Ok,
    Error,
}

/// JSON report written by the harness.
#[derive(Debug, Clone, Deserialize)]
pub struct HarnessReport {
    pub status: ReportStatus,
    #[serde(default)]
    pub chart_generated: bool,
    /// Everything the submission wrote to `sys.stdout` / `sys.stderr`,
    /// possibly truncated.
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub traceback: Option<String>,
}

/// What the renderer should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Read the saved PNG.
    ChartReady,
    Message(String),
    Failed(String),
}

/// Load the report at `path`. Absent or unparsable files yield `None`.
pub async fn read_report(path: &Path) -> Option<HarnessReport> {
    let bytes = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!(error = %e, "Harness report is malformed");
            None
        }
    }
}

/// Decide the outcome of one harness run.
pub fn interpret(report: Option<HarnessReport>, output: &ScriptOutput) -> Verdict {
    match report {
        Some(report) => match report.status {
            ReportStatus::Error => Verdict::Failed(report.traceback.unwrap_or(report.output)),
            ReportStatus::Ok if report.chart_generated => Verdict::ChartReady,
            ReportStatus::Ok => Verdict::Message(format!("{NO_FIGURE_MESSAGE}{}", report.output)),
        },
        None => {
            tracing::warn!(
                exit_code = output.exit_code,
                "Harness exited without a report"
            );
            if output.stderr.trim().is_empty() {
                Verdict::Failed(format!(
                    "Interpreter exited with code {} without reporting a result",
                    output.exit_code
                ))
            } else {
                Verdict::Failed(output.stderr.clone())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
