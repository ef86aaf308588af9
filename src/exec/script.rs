//! Stateless script execution with structured outcomes.
//!
//! Each directive runs as a fresh interpreter process; all state the scripts
//! want to keep must go through files in the working directory. Failure is
//! judged by exit code and timeout, never by sniffing the output text for
//! error-looking substrings.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::process::Command;

use crate::config::ExecutorConfig;
use crate::error::{CadreError, Result};

static SCRIPT_SEQ: AtomicU64 = AtomicU64::new(0);

/// A scratch path unique within this process, so concurrent runners never
/// clobber each other's scripts.
fn scratch_path() -> PathBuf {
    let seq = SCRIPT_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("cadre-script-{}-{}.py", std::process::id(), seq))
}

/// Structured result of one script execution
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    /// Merged stdout/stderr, truncated to the configured byte limit
    pub output: String,

    /// Exit code of the interpreter, if it exited normally
    pub exit_code: Option<i32>,

    /// Whether the run was killed at the timeout
    pub timed_out: bool,
}

impl ExecOutcome {
    /// Success is exit code zero without a timeout
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Runs generated scripts through the configured interpreter.
pub struct ScriptRunner {
    command: String,
    work_dir: PathBuf,
    timeout: Duration,
    max_output_bytes: usize,
}

impl ScriptRunner {
    /// Create a runner that executes scripts with `work_dir` as their cwd,
    /// so relative artifact paths land in the shared output directory.
    pub fn new(config: &ExecutorConfig, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: config.command.clone(),
            work_dir: work_dir.into(),
            timeout: Duration::from_millis(config.timeout_ms),
            max_output_bytes: config.max_output_bytes,
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Execute a source string and capture the outcome.
    ///
    /// The source is written to a scratch file outside the working directory
    /// so the artifact diff never sees it; the file is removed once the run
    /// ends.
    pub async fn run(&self, code: &str) -> Result<ExecOutcome> {
        let script_path = scratch_path();
        tokio::fs::write(&script_path, code).await?;

        let result = self.execute(&script_path).await;
        let _ = tokio::fs::remove_file(&script_path).await;
        result
    }

    async fn execute(&self, script_path: &Path) -> Result<ExecOutcome> {
        let child = Command::new(&self.command)
            .arg(script_path)
            .current_dir(&self.work_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CadreError::Interpreter(format!("Failed to spawn {}: {}", self.command, e)))?;

        // wait_with_output drains both pipes while waiting, so a script
        // writing more than the pipe buffer cannot deadlock against us
        let result = tokio::time::timeout(self.timeout, child.wait_with_output()).await;

        match result {
            Ok(Ok(captured)) => {
                let stdout = String::from_utf8_lossy(&captured.stdout);
                let stderr = String::from_utf8_lossy(&captured.stderr);

                let mut output = stdout.into_owned();
                if !stderr.is_empty() {
                    if !output.is_empty() {
                        output.push_str("\n--- stderr ---\n");
                    }
                    output.push_str(&stderr);
                }

                if output.len() > self.max_output_bytes {
                    let mut end = self.max_output_bytes;
                    while !output.is_char_boundary(end) {
                        end -= 1;
                    }
                    output.truncate(end);
                    output.push_str("\n... [output truncated]");
                }

                Ok(ExecOutcome {
                    output,
                    exit_code: captured.status.code(),
                    timed_out: false,
                })
            }
            Ok(Err(e)) => Err(CadreError::Io(e)),
            // The timeout dropped the wait future; kill_on_drop reaps the child
            Err(_) => Ok(ExecOutcome {
                output: format!("Execution timed out after {:?}", self.timeout),
                exit_code: None,
                timed_out: true,
            }),
        }
    }
}
