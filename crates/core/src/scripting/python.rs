//! Python script executor.
//!
//! Runs scripts with a configurable interpreter (`python3` on `PATH` by
//! default, or a venv's `bin/python`).

use std::path::Path;
use std::time::Duration;

use super::executor::{ScriptError, ScriptExecutor, ScriptInput, ScriptOutput};
use super::subprocess;

/// Default interpreter when none is configured.
pub const DEFAULT_PYTHON_BIN: &str = "python3";

/// Executor for Python scripts.
#[derive(Debug, Clone)]
pub struct PythonExecutor {
    python_bin: String,
}

impl PythonExecutor {
    /// Create a new executor that runs scripts with `python_bin`.
    pub fn new(python_bin: impl Into<String>) -> Self {
        Self {
            python_bin: python_bin.into(),
        }
    }

    /// The interpreter this executor spawns.
    pub fn python_bin(&self) -> &str {
        &self.python_bin
    }

    /// Check that the interpreter starts and can import every module in `modules`.
    ///
    /// Returns [`ScriptError::ExecutionFailed`] carrying the interpreter's
    /// stderr when an import fails.
    pub async fn check_imports(&self, modules: &[&str], timeout: Duration) -> Result<(), ScriptError> {
        let mut cmd = tokio::process::Command::new(&self.python_bin);
        cmd.arg("-c").arg(format!("import {}", modules.join(", ")));

        let input = ScriptInput {
            data: serde_json::Value::Null,
            env_vars: vec![("MPLBACKEND".to_string(), "Agg".to_string())],
            working_directory: None,
            timeout,
        };

        let output = subprocess::run_command(&mut cmd, input).await?;
        if output.exit_code != 0 {
            return Err(ScriptError::ExecutionFailed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }
        Ok(())
    }
}

impl Default for PythonExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON_BIN)
    }
}

impl ScriptExecutor for PythonExecutor {
    async fn execute(
        &self,
        script_path: &Path,
        input: ScriptInput,
    ) -> Result<ScriptOutput, ScriptError> {
        let mut cmd = tokio::process::Command::new(&self.python_bin);
        cmd.arg(script_path);
        subprocess::run_command(&mut cmd, input).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
