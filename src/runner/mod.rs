//! Runner module - Process execution layer
//!
//! Two invocation shapes are supported:
//! - `Invocation::Shell`: one shell command line, optional piped stdin
//!   (compile steps and interpreted solutions)
//! - `Invocation::Spawn`: a program spawned directly with its own stdin,
//!   stdout and stderr pipes (compiled artifacts)
//!
//! The runner module does NOT:
//! - Compare outputs or determine verdicts
//! - Know which language produced a command

pub mod piped;
pub mod shell;

#[cfg(test)]
pub(crate) mod scripted;

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use piped::LocalRunner;

/// Command specification for direct execution
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    /// Program path or name
    pub program: String,
    /// Arguments to the program
    pub args: Vec<String>,
    /// Working directory
    pub work_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            work_dir: None,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(|a| a.into()).collect();
        self
    }

    pub fn with_work_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.work_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Create from a command vector (first element is program, rest are args)
    pub fn from_vec(cmd: &[String]) -> Self {
        let mut iter = cmd.iter();
        let program = iter.next().cloned().unwrap_or_default();
        Self {
            program,
            args: iter.cloned().collect(),
            work_dir: None,
        }
    }
}

/// A single external invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Run through the platform shell
    Shell {
        line: String,
        work_dir: Option<PathBuf>,
    },
    /// Spawn a program directly
    Spawn(CommandSpec),
}

impl Invocation {
    pub fn shell(line: impl Into<String>) -> Self {
        Invocation::Shell {
            line: line.into(),
            work_dir: None,
        }
    }

    /// Human-readable form for logs and diagnostics
    pub fn describe(&self) -> String {
        match self {
            Invocation::Shell { line, .. } => line.clone(),
            Invocation::Spawn(cmd) => {
                let mut parts = vec![cmd.program.clone()];
                parts.extend(cmd.args.iter().cloned());
                parts.join(" ")
            }
        }
    }
}

/// Bounds applied to one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunLimits {
    /// Wall-clock timeout; `None` waits for the process indefinitely
    pub timeout: Option<Duration>,
}

impl RunLimits {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

/// Execution status (raw, no verdict interpretation)
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// Program exited normally with given exit code
    Exited(i32),
    /// Killed by signal
    Signaled(i32),
    /// Killed after exceeding the configured timeout
    TimedOut,
}

impl RunStatus {
    /// Check if execution was successful (exited with code 0)
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Exited(0))
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Exited(code) => write!(f, "exited with code {}", code),
            RunStatus::Signaled(sig) => write!(f, "killed by signal {}", sig),
            RunStatus::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Outcome of running a program
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Execution status
    pub status: RunStatus,
    /// Stdout content
    pub stdout: String,
    /// Stderr content
    pub stderr: String,
    /// Wall-clock time in milliseconds
    pub elapsed_ms: u64,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Exit code (-1 if the process did not exit normally)
    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Exited(code) => code,
            _ => -1,
        }
    }
}

/// Runner trait for executing external processes
///
/// An `Ok` outcome means the process ran to completion (or was killed on
/// timeout) and all of its output was collected. `Err` is reserved for
/// process-level failures such as a program that cannot be spawned.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(
        &self,
        invocation: &Invocation,
        limits: &RunLimits,
        stdin: Option<&str>,
    ) -> Result<RunOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_from_vec() {
        let cmd = CommandSpec::from_vec(&["./a.out".to_string(), "-v".to_string()]);
        assert_eq!(cmd.program, "./a.out");
        assert_eq!(cmd.args, vec!["-v"]);
    }

    #[test]
    fn test_describe_spawn() {
        let inv = Invocation::Spawn(CommandSpec::new("/tmp/sol").with_args(["x", "y"]));
        assert_eq!(inv.describe(), "/tmp/sol x y");
    }

    #[test]
    fn test_run_status_display() {
        assert_eq!(RunStatus::Exited(3).to_string(), "exited with code 3");
        assert_eq!(RunStatus::TimedOut.to_string(), "timed out");
        assert!(RunStatus::Exited(0).is_success());
        assert!(!RunStatus::Signaled(9).is_success());
    }
}
