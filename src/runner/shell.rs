//! Shell invocation shape
//!
//! Runs a single command line through the platform shell (`sh -c` on unix,
//! `cmd /C` on windows). Used for compile steps and interpreted solutions.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use super::piped::{configure, drive};
use super::{RunLimits, RunOutcome};

/// Run `line` through the shell, optionally piping `stdin_content` into it
pub async fn execute(
    line: &str,
    work_dir: Option<&Path>,
    limits: &RunLimits,
    stdin_content: Option<&str>,
) -> Result<RunOutcome> {
    debug!("Running shell command: {}", line);

    let mut command = shell_command(line);
    if let Some(dir) = work_dir {
        command.current_dir(dir);
    }

    let child = configure(&mut command, stdin_content.is_some())
        .spawn()
        .with_context(|| format!("Failed to start shell for `{}`", line))?;

    drive(child, stdin_content, limits).await
}

#[cfg(unix)]
fn shell_command(line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(line);
    command
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(line);
    command
}

/// Quote a path or argument so the shell passes it through as one word
#[cfg(unix)]
pub fn quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c));
    if safe {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(windows)]
pub fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"', '&', '|', '<', '>', '^']) {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\"\""))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runner::RunStatus;

    #[test]
    fn test_quote() {
        assert_eq!(quote("/tmp/sol.py"), "/tmp/sol.py");
        assert_eq!(quote("/tmp/my sol.py"), "'/tmp/my sol.py'");
        assert_eq!(quote("it's.py"), r"'it'\''s.py'");
        assert_eq!(quote(""), "''");
    }

    #[tokio::test]
    async fn test_shell_pipes_input() {
        let outcome = execute("cat", None, &RunLimits::default(), Some("hello"))
            .await
            .unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.stdout, "hello");
    }

    #[tokio::test]
    async fn test_shell_captures_failure_output() {
        let outcome = execute(
            "echo 'error: expected ;' >&2; exit 1",
            None,
            &RunLimits::default(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(outcome.status, RunStatus::Exited(1));
        assert_eq!(outcome.stderr.trim(), "error: expected ;");
    }

    #[tokio::test]
    async fn test_shell_quoted_path_with_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("my input.txt");
        std::fs::write(&file, "42").unwrap();

        let line = format!("cat {}", quote(file.to_str().unwrap()));
        let outcome = execute(&line, None, &RunLimits::default(), None)
            .await
            .unwrap();
        assert_eq!(outcome.stdout, "42");
    }
}
