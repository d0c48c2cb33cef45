//! Host collaborators
//!
//! The harness only needs three things from whatever drives it: append a
//! report line, ask for a line of text, and ask for a file path.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Line-oriented sink for verdict messages
pub trait Reporter: Send + Sync {
    fn line(&self, text: &str);
}

/// Prints report lines to stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn line(&self, text: &str) {
        println!("{}", text);
    }
}

/// Keeps report lines in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl Reporter for MemoryReporter {
    fn line(&self, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(text.to_string());
        }
    }
}

/// Interactive input from the user
pub trait Prompt {
    /// Ask for a line of text; `None` when the user gives nothing
    fn ask_text(&self, prompt: &str) -> Result<Option<String>>;

    /// Ask for a file path, hinting at the accepted extensions
    fn pick_file(&self, label: &str, extensions: &[String]) -> Result<Option<PathBuf>>;
}

/// Prompts on stderr and reads answers from stdin
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    fn read_answer(&self, question: &str) -> Result<Option<String>> {
        let mut stderr = io::stderr();
        write!(stderr, "{}: ", question)?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read from stdin")?;

        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }
}

impl Prompt for ConsolePrompt {
    fn ask_text(&self, prompt: &str) -> Result<Option<String>> {
        self.read_answer(prompt)
    }

    fn pick_file(&self, label: &str, extensions: &[String]) -> Result<Option<PathBuf>> {
        let hint = extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ");
        let answer = self.read_answer(&format!("{} ({})", label, hint))?;
        Ok(answer.map(PathBuf::from))
    }
}
