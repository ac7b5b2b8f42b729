//! Unified script execution interface and shared types.
//!
//! Defines [`ScriptExecutor`], the trait the interpreter executors implement,
//! along with [`ScriptInput`], [`ScriptOutput`], and [`ScriptError`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input data passed to a script executor.
#[derive(Debug, Clone)]
pub struct ScriptInput {
    /// JSON payload piped to the script's stdin.
    pub data: Value,
    /// Additional environment variables set for the child process.
    pub env_vars: Vec<(String, String)>,
    /// Working directory for the child process (uses current dir if `None`).
    pub working_directory: Option<PathBuf>,
    /// Maximum wall-clock time before the process is killed.
    pub timeout: Duration,
}

/// Captured output from a script execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptOutput {
    /// Complete stdout captured from the process.
    pub stdout: String,
    /// Complete stderr captured from the process.
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Stdout parsed as JSON, or `None` if stdout is not valid JSON.
    pub parsed_output: Option<Value>,
}

/// Errors that can occur during script execution.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The interpreter or script file was not found.
    #[error("Script not found: {0}")]
    NotFound(String),

    /// The script exceeded its configured timeout and was killed.
    #[error("Script timed out after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed wall-clock time before the process was killed.
        elapsed_ms: u64,
    },

    /// The interpreter could not run the script at all.
    #[error("Script failed with exit code {exit_code}: {stderr}")]
    ExecutionFailed {
        /// Process exit code.
        exit_code: i32,
        /// Captured stderr output.
        stderr: String,
    },

    /// An I/O error occurred while spawning or communicating with the process.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Trait implemented by script runtime executors.
///
/// Each executor receives a file path and structured input, spawns the
/// appropriate subprocess, and returns structured output or an error.
pub trait ScriptExecutor: Send + Sync {
    /// Execute the script at `script_path` with the given `input`.
    fn execute(
        &self,
        script_path: &Path,
        input: ScriptInput,
    ) -> impl std::future::Future<Output = Result<ScriptOutput, ScriptError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
