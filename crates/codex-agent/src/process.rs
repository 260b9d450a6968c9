use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::{CodexError, Result};

// ─── Options / result ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Pipe stdout/stderr into the result instead of inheriting the terminal.
    pub capture_output: bool,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            capture_output: true,
            cwd: None,
            env: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExecutionResult {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub execution_time_ms: u64,
}

// ─── execute_command ──────────────────────────────────────────────────────

/// Run `program` with `args` to completion.
///
/// A spawn failure because the binary does not exist maps to
/// [`CodexError::NotFound`]. When `opts.timeout` elapses the child is killed
/// and [`CodexError::Timeout`] is returned. A non-zero exit is not an error at
/// this level; inspect [`ExecutionResult::success`].
pub async fn execute_command<S: AsRef<str>>(
    program: &str,
    args: &[S],
    opts: &ExecOptions,
) -> Result<ExecutionResult> {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(AsRef::as_ref))
        .stdin(Stdio::null())
        .kill_on_drop(true);
    if opts.capture_output {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    }
    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }
    for (k, v) in &opts.env {
        cmd.env(k, v);
    }

    tracing::debug!(program, args = args.len(), "spawning process");
    let started = Instant::now();
    let child = cmd.spawn().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CodexError::NotFound(program.to_string()),
        _ => CodexError::Io(e),
    })?;

    // Dropping the wait future on timeout drops the child, and kill_on_drop
    // terminates it.
    let output = match opts.timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(out) => out?,
            Err(_) => {
                tracing::warn!(program, secs = limit.as_secs(), "process timed out; killed");
                return Err(CodexError::Timeout {
                    program: program.to_string(),
                    secs: limit.as_secs(),
                });
            }
        },
        None => child.wait_with_output().await?,
    };

    let result = ExecutionResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
        execution_time_ms: started.elapsed().as_millis() as u64,
    };
    tracing::debug!(
        program,
        exit_code = ?result.exit_code,
        ms = result.execution_time_ms,
        "process finished"
    );
    Ok(result)
}
