//! Process execution collaborator.
//!
//! One call launches one shell child and waits for it to exit with both
//! output streams drained in full. No timeout is applied.

use crate::error::ExecError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a full command line through a shell interpreter.
///
/// Implementations must honor shell syntax (pipes, redirects, globs, variable
/// expansion) exactly as a typed command would.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    async fn run(&self, command_line: &str) -> Result<ExecOutput, ExecError>;
}

/// Runs commands on the local machine as `<program> -c <command_line>`.
#[derive(Debug, Clone)]
pub struct LocalShell {
    program: String,
}

impl LocalShell {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for LocalShell {
    fn default() -> Self {
        Self::new("sh")
    }
}

#[async_trait]
impl ShellRunner for LocalShell {
    async fn run(&self, command_line: &str) -> Result<ExecOutput, ExecError> {
        run_process(&self.program, &["-c", command_line]).await
    }
}

/// Spawn a process with piped output and wait for it to finish.
pub async fn run_process(program: &str, args: &[&str]) -> Result<ExecOutput, ExecError> {
    debug!(program, ?args, "spawning process");
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let output = child
        .wait_with_output()
        .await
        .map_err(|source| ExecError::Wait {
            program: program.to_string(),
            source,
        })?;

    debug!(program, status = ?output.status, "process exited");
    Ok(ExecOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
