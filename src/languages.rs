//! Language configuration for compilation and execution
//!
//! Each language is one table in `files/languages.toml`. Adding a language is
//! a data change; the judger only ever talks to `LanguageConfig`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::compiler::Artifact;
use crate::error::HarnessError;
use crate::normalizer::InputFormat;
use crate::runner::{shell, CommandSpec, Invocation};

const SOURCE: &str = "{source}";
const ARTIFACT: &str = "{artifact}";

/// A solution file selected for a run
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub path: PathBuf,
    /// Language tag: the file extension without the dot (empty if none)
    pub tag: String,
}

impl Solution {
    /// Relative paths are resolved against the current directory, so
    /// commands never run in an empty work dir and artifacts never end up
    /// as bare names looked up in `PATH`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let path = std::path::absolute(&path).unwrap_or(path);
        let tag = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, tag }
    }
}

/// Configuration for a supported programming language
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageConfig {
    /// Language name (e.g., "cpp")
    pub name: String,
    /// File extensions handled by this language, without the dot
    pub extensions: Vec<String>,
    /// Compile command template (None if not needed)
    pub compile_command: Option<String>,
    /// Run command template
    pub run_command: String,
    /// How case input is adapted before it reaches stdin
    pub input_format: InputFormat,
}

impl LanguageConfig {
    pub fn needs_compile(&self) -> bool {
        self.compile_command.is_some()
    }

    /// Shell invocation compiling `source` into `artifact`
    pub fn compile_invocation(&self, source: &Path, artifact: &Path) -> Option<Invocation> {
        let template = self.compile_command.as_ref()?;
        let line = template
            .replace(SOURCE, &shell::quote(&source.to_string_lossy()))
            .replace(ARTIFACT, &shell::quote(&artifact.to_string_lossy()));

        Some(Invocation::Shell {
            line,
            work_dir: work_dir_of(source),
        })
    }

    /// Invocation running one case
    ///
    /// Interpreted languages go through the shell; compiled languages spawn
    /// their artifact directly so stdin can be written and closed first.
    pub fn run_invocation(
        &self,
        source: &Path,
        artifact: Option<&Artifact>,
    ) -> Result<Invocation, HarnessError> {
        let work_dir = work_dir_of(source);

        if !self.needs_compile() {
            let line = self
                .run_command
                .replace(SOURCE, &shell::quote(&source.to_string_lossy()));
            return Ok(Invocation::Shell { line, work_dir });
        }

        let artifact = artifact.ok_or_else(|| {
            HarnessError::RunFailure(format!("{} solution has not been compiled", self.name))
        })?;

        let argv: Vec<String> = into_command(&self.run_command)
            .into_iter()
            .map(|arg| {
                arg.replace(ARTIFACT, &artifact.path().to_string_lossy())
                    .replace(SOURCE, &source.to_string_lossy())
            })
            .collect();

        let mut cmd = CommandSpec::from_vec(&argv);
        if let Some(dir) = work_dir {
            cmd = cmd.with_work_dir(dir);
        }
        Ok(Invocation::Spawn(cmd))
    }
}

/// Raw TOML configuration for a language
#[derive(Debug, Deserialize)]
struct RawLanguageConfig {
    extensions: Vec<String>,
    compile_command: Option<String>,
    run_command: String,
    #[serde(default)]
    input_format: InputFormat,
}

/// Registry of build strategies, keyed by language name and file extension
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: HashMap<String, LanguageConfig>,
    by_extension: HashMap<String, String>,
}

impl LanguageRegistry {
    /// Languages shipped with the crate
    pub fn builtin() -> anyhow::Result<Self> {
        let content = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/files/languages.toml"));
        Self::from_toml_str(content).context("Built-in language table is invalid")
    }

    /// Load a language table from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read language config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid language config {}", path.display()))
    }

    /// Built-in table, or the file at `path` when one is given
    pub fn load_or_builtin(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let raw_configs: HashMap<String, RawLanguageConfig> = toml::from_str(content)?;

        let mut languages = HashMap::new();
        let mut by_extension = HashMap::new();

        for (name, raw) in raw_configs {
            let name = name.to_lowercase();

            if raw.extensions.is_empty() {
                anyhow::bail!("Language {} declares no extensions", name);
            }
            if let Some(compile) = &raw.compile_command {
                if !compile.contains(ARTIFACT) {
                    anyhow::bail!("Compile command for {} must mention {}", name, ARTIFACT);
                }
                if !raw.run_command.contains(ARTIFACT) {
                    anyhow::bail!("Run command for compiled {} must mention {}", name, ARTIFACT);
                }
            }

            let extensions: Vec<String> = raw
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect();

            for ext in &extensions {
                if let Some(other) = by_extension.insert(ext.clone(), name.clone()) {
                    anyhow::bail!("Extension .{} is claimed by both {} and {}", ext, other, name);
                }
            }

            let config = LanguageConfig {
                name: name.clone(),
                extensions,
                compile_command: raw.compile_command,
                run_command: raw.run_command,
                input_format: raw.input_format,
            };
            languages.insert(name, config);
        }

        Ok(Self {
            languages,
            by_extension,
        })
    }

    /// Get language configuration by language name
    pub fn get(&self, language: &str) -> Option<&LanguageConfig> {
        self.languages.get(&language.to_lowercase())
    }

    /// Strategy for a language tag (file extension, exact match)
    pub fn resolve(&self, tag: &str) -> Result<&LanguageConfig, HarnessError> {
        self.by_extension
            .get(tag)
            .and_then(|name| self.languages.get(name))
            .ok_or_else(|| HarnessError::UnsupportedLanguage(format!(".{}", tag)))
    }

    /// Strategy for a selected solution file
    pub fn strategy_for(&self, solution: &Solution) -> Result<&LanguageConfig, HarnessError> {
        if solution.tag.is_empty() {
            return Err(HarnessError::UnsupportedLanguage(format!(
                "{} has no file extension",
                solution.path.display()
            )));
        }
        self.resolve(&solution.tag)
    }

    /// Get all supported language names, sorted
    pub fn supported_languages(&self) -> Vec<String> {
        let mut names: Vec<String> = self.languages.keys().cloned().collect();
        names.sort();
        names
    }

    /// Every accepted file extension, sorted
    pub fn extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.by_extension.keys().cloned().collect();
        exts.sort();
        exts
    }
}

/// Directory of `source`; `None` for a bare file name
fn work_dir_of(source: &Path) -> Option<PathBuf> {
    source
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn into_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(|s| s.to_string()).collect()
}
