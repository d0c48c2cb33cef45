//! Local runner implementation
//!
//! Executes commands directly on the host. Every child has piped stdin,
//! stdout and stderr; stdin is written and closed while both output streams
//! are drained, and the invocation completes only once the process has
//! exited and both streams reached EOF.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tracing::{debug, warn};

use super::{shell, CommandSpec, Invocation, RunLimits, RunOutcome, RunStatus, Runner};

/// Runner that executes processes directly on the host, without sandbox
#[derive(Debug, Default, Clone)]
pub struct LocalRunner;

impl LocalRunner {
    pub fn new() -> Self {
        Self
    }

    /// Spawn a program directly and collect its output
    pub async fn execute(
        &self,
        cmd: &CommandSpec,
        limits: &RunLimits,
        stdin_content: Option<&str>,
    ) -> Result<RunOutcome> {
        debug!("Spawning {:?} with args: {:?}", cmd.program, cmd.args);

        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(dir) = &cmd.work_dir {
            command.current_dir(dir);
        }

        let child = configure(&mut command, stdin_content.is_some())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", cmd.program))?;

        drive(child, stdin_content, limits).await
    }
}

#[async_trait]
impl Runner for LocalRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        limits: &RunLimits,
        stdin: Option<&str>,
    ) -> Result<RunOutcome> {
        match invocation {
            Invocation::Shell { line, work_dir } => {
                shell::execute(line, work_dir.as_deref(), limits, stdin).await
            }
            Invocation::Spawn(cmd) => self.execute(cmd, limits, stdin).await,
        }
    }
}

/// Pipe setup shared by both invocation shapes
pub(crate) fn configure(command: &mut Command, with_stdin: bool) -> &mut Command {
    let stdin = if with_stdin {
        Stdio::piped()
    } else {
        Stdio::null()
    };
    command
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
}

/// Feed stdin, drain stdout/stderr and wait for exit, bounded by `limits`
///
/// On timeout, or when the returned future is dropped, only the direct child
/// is killed. For a shell invocation such as `sh -c "a && b"` that child is
/// the shell, so processes it started can outlive it and keep running.
pub(crate) async fn drive(
    mut child: Child,
    stdin_content: Option<&str>,
    limits: &RunLimits,
) -> Result<RunOutcome> {
    let started = Instant::now();

    let input = child.stdin.take();
    let mut stdout = child.stdout.take().context("stdout was not piped")?;
    let mut stderr = child.stderr.take().context("stderr was not piped")?;

    let collect = async {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let (fed, read_out, read_err) = tokio::join!(
            feed(input, stdin_content),
            stdout.read_to_end(&mut out),
            stderr.read_to_end(&mut err),
        );
        fed.context("Failed to write stdin")?;
        read_out.context("Failed to read stdout")?;
        read_err.context("Failed to read stderr")?;

        let status = child.wait().await.context("Failed to wait for process")?;
        anyhow::Ok((status, out, err))
    };

    let finished = match limits.timeout {
        Some(timeout) => tokio::time::timeout(timeout, collect).await.ok(),
        None => Some(collect.await),
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;

    match finished {
        Some(result) => {
            let (status, out, err) = result?;
            let status = run_status(status);
            debug!("Process finished: {} in {}ms", status, elapsed_ms);

            Ok(RunOutcome {
                status,
                stdout: String::from_utf8_lossy(&out).to_string(),
                stderr: String::from_utf8_lossy(&err).to_string(),
                elapsed_ms,
            })
        }
        None => {
            warn!("Process exceeded {:?}, killing it", limits.timeout);
            if let Err(e) = child.start_kill() {
                warn!("Failed to kill timed out process: {}", e);
            }
            let _ = child.wait().await;

            Ok(RunOutcome {
                status: RunStatus::TimedOut,
                stdout: String::new(),
                stderr: String::new(),
                elapsed_ms,
            })
        }
    }
}

async fn feed(pipe: Option<ChildStdin>, content: Option<&str>) -> std::io::Result<()> {
    let (Some(mut pipe), Some(content)) = (pipe, content) else {
        return Ok(());
    };

    match pipe.write_all(content.as_bytes()).await {
        // Program exited without reading all of its input
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("stdin closed early by child");
            Ok(())
        }
        other => other,
    }
    // pipe dropped here, closing the child's stdin
}

fn run_status(status: ExitStatus) -> RunStatus {
    if let Some(code) = status.code() {
        return RunStatus::Exited(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return RunStatus::Signaled(signal);
        }
    }

    RunStatus::Exited(-1)
}
