//! External command execution.
//!
//! Commands are argument vectors, never shell strings: nothing is parsed by
//! a shell, so interface names need no quoting. Only the exit status is
//! observed; stdout and stderr are discarded.

use crate::error::{VlanError, VlanResult};
use async_trait::async_trait;
use std::fmt;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Exit status a shell reports when the program does not exist.
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Exit status a shell reports when the program is not executable.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Exit status reported for a process terminated by a signal.
pub const EXIT_SIGNALED: i32 = -1;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs a command and reports its exit status.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, cmd: &CommandLine) -> VlanResult<i32>;
}

/// Runs commands as child processes with a per-command timeout.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, cmd: &CommandLine) -> VlanResult<i32> {
        debug!(command = %cmd, "Executing command");

        let spawned = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(command = %cmd, "Command not found");
                return Ok(EXIT_COMMAND_NOT_FOUND);
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                debug!(command = %cmd, "Command not executable");
                return Ok(EXIT_NOT_EXECUTABLE);
            }
            Err(e) => {
                warn!(command = %cmd, error = %e, "Failed to spawn command");
                return Err(VlanError::command(
                    format!("Failed to execute '{}': {}", cmd, e),
                    cmd.to_string(),
                    Some(e),
                ));
            }
        };

        match timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                let exit_code = status.code().unwrap_or(EXIT_SIGNALED);
                debug!(command = %cmd, exit_code, "Command finished");
                Ok(exit_code)
            }
            Ok(Err(e)) => {
                warn!(command = %cmd, error = %e, "Failed to wait for command");
                Err(VlanError::command(
                    format!("Failed to wait for '{}': {}", cmd, e),
                    cmd.to_string(),
                    Some(e),
                ))
            }
            Err(_) => {
                let _ = child.kill().await;
                warn!(
                    command = %cmd,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Command timed out"
                );
                Err(VlanError::command(
                    format!(
                        "Command '{}' timed out after {:.1}s",
                        cmd,
                        self.timeout.as_secs_f64()
                    ),
                    cmd.to_string(),
                    None,
                ))
            }
        }
    }
}
