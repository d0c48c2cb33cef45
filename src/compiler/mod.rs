//! Compiler module - One-time solution compilation
//!
//! A compiled language is built once per batch. The resulting artifact is
//! either left beside the solution or placed in a scratch directory that is
//! removed together with the `Artifact`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::env::consts::EXE_EXTENSION;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::languages::LanguageConfig;
use crate::runner::{RunOutcome, RunStatus, Runner};

/// A runnable binary produced by the compile step
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    /// Scratch directory removed on drop (scoped artifacts only)
    scratch: Option<TempDir>,
}

impl Artifact {
    /// Artifact at a fixed location, never removed by the harness
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            scratch: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_scoped(&self) -> bool {
        self.scratch.is_some()
    }
}

/// Result of a successful compilation
#[derive(Debug)]
pub struct Compilation {
    pub artifact: Artifact,
    /// Compiler diagnostics printed despite success (warnings)
    pub warnings: Option<String>,
}

/// Compile `source` with the language's compile template
///
/// Returns `Ok(None)` for interpreted languages. Any failure, including a
/// compiler that cannot be started or times out, is a `CompileFailure`.
pub async fn compile_solution(
    runner: &dyn Runner,
    lang: &LanguageConfig,
    source: &Path,
    config: &HarnessConfig,
) -> Result<Option<Compilation>, HarnessError> {
    if !lang.needs_compile() {
        return Ok(None);
    }

    let artifact = prepare_artifact(source, config.keep_artifacts)?;
    let invocation = lang
        .compile_invocation(source, artifact.path())
        .ok_or_else(|| HarnessError::CompileFailure(format!("{} has no compile command", lang.name)))?;

    info!("Compiling {} -> {}", source.display(), artifact.path().display());
    debug!("Compile command: {}", invocation.describe());

    let outcome = runner
        .run(&invocation, &config.compile_limits(), None)
        .await
        .map_err(|e| HarnessError::CompileFailure(format!("{:#}", e)))?;

    if !outcome.is_success() {
        warn!("Compilation failed: {}", outcome.status);
        return Err(HarnessError::CompileFailure(failure_message(&outcome)));
    }

    if !artifact.path().exists() {
        return Err(HarnessError::CompileFailure(format!(
            "compiler reported success but produced no binary at {}",
            artifact.path().display()
        )));
    }

    let warnings = Some(outcome.stderr.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if let Some(text) = &warnings {
        warn!("Compiler warnings: {}", text);
    }

    info!("Compiled successfully in {}ms", outcome.elapsed_ms);
    Ok(Some(Compilation { artifact, warnings }))
}

fn prepare_artifact(source: &Path, keep: bool) -> Result<Artifact, HarnessError> {
    let stem = source
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("solution"));

    let mut name = stem;
    if !EXE_EXTENSION.is_empty() {
        name.push(".");
        name.push(EXE_EXTENSION);
    }

    if keep {
        return Ok(Artifact::at(source.with_file_name(name)));
    }

    let scratch = tempfile::Builder::new().prefix("selfjudge-").tempdir()?;
    Ok(Artifact {
        path: scratch.path().join(name),
        scratch: Some(scratch),
    })
}

/// Compiler output shown verbatim; status text only when it printed nothing
fn failure_message(outcome: &RunOutcome) -> String {
    if !outcome.stderr.trim().is_empty() {
        outcome.stderr.trim_end().to_string()
    } else if !outcome.stdout.trim().is_empty() {
        outcome.stdout.trim_end().to_string()
    } else {
        match outcome.status {
            RunStatus::TimedOut => "Compilation timed out".to_string(),
            RunStatus::Signaled(_) => "Compiler crashed".to_string(),
            RunStatus::Exited(code) => format!("Compilation failed with exit code {}", code),
        }
    }
}
