//! Harness configuration
//!
//! Configuration is an explicit value passed to the judger, loaded from
//! environment variables (and `.env`) and then overridden by CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::runner::RunLimits;

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Root directory holding `test_cases/<slug>/` (default: current directory)
    pub workspace: PathBuf,
    /// Optional TOML file replacing the built-in language table
    pub languages_path: Option<PathBuf>,
    /// Per-case run timeout (default: 10s, `None` waits forever)
    pub run_timeout: Option<Duration>,
    /// Compile timeout (default: 60s, `None` waits forever)
    pub compile_timeout: Option<Duration>,
    /// Leave compiled artifacts beside the solution instead of a scratch dir
    pub keep_artifacts: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("."),
            languages_path: None,
            run_timeout: Some(Duration::from_secs(10)),
            compile_timeout: Some(Duration::from_secs(60)),
            keep_artifacts: true,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(workspace) = lookup("SELFJUDGE_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }
        if let Some(path) = lookup("LANGUAGES_CONFIG") {
            config.languages_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup("RUN_TIMEOUT_SECS") {
            config.run_timeout = parse_timeout(&secs)
                .with_context(|| format!("Invalid RUN_TIMEOUT_SECS: {}", secs))?;
        }
        if let Some(secs) = lookup("COMPILE_TIMEOUT_SECS") {
            config.compile_timeout = parse_timeout(&secs)
                .with_context(|| format!("Invalid COMPILE_TIMEOUT_SECS: {}", secs))?;
        }
        if let Some(keep) = lookup("KEEP_ARTIFACTS") {
            config.keep_artifacts = parse_flag(&keep)
                .with_context(|| format!("Invalid KEEP_ARTIFACTS: {}", keep))?;
        }

        Ok(config)
    }

    /// Limits applied to each solution run
    pub fn run_limits(&self) -> RunLimits {
        RunLimits::new(self.run_timeout)
    }

    /// Limits applied to the one-time compile step
    pub fn compile_limits(&self) -> RunLimits {
        RunLimits::new(self.compile_timeout)
    }
}

/// Seconds to timeout; `0` disables the timeout
pub fn parse_timeout(secs: &str) -> anyhow::Result<Option<Duration>> {
    let secs: u64 = secs.trim().parse()?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}
