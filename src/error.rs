//! Error taxonomy of the harness
//!
//! Case-local failures (`MalformedInput`, `RunFailure`) end up as failed
//! verdicts. Batch-level failures abort a run before any verdict exists.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Input transform could not extract or parse the expected structure
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// No strategy is registered for the solution's extension
    #[error("Unsupported file type: {0}")]
    UnsupportedLanguage(String),

    /// Input and output case counts differ
    #[error("Mismatch between the number of input ({inputs}) and output ({outputs}) files")]
    StructureMismatch { inputs: usize, outputs: usize },

    /// Compiler exited unsuccessfully or could not be run; carries its output verbatim
    #[error("Compilation failed: {0}")]
    CompileFailure(String),

    /// Process could not be spawned or driven
    #[error("Failed to run solution: {0}")]
    RunFailure(String),

    #[error("No test cases found in {}", .0.display())]
    CasesNotFound(PathBuf),

    #[error("Invalid problem identifier: {0}")]
    InvalidProblem(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Whether this error aborts a whole batch rather than a single case
    pub fn is_batch_fatal(&self) -> bool {
        !matches!(
            self,
            HarnessError::MalformedInput(_) | HarnessError::RunFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_mismatch_message() {
        let err = HarnessError::StructureMismatch {
            inputs: 3,
            outputs: 2,
        };
        assert_eq!(
            err.to_string(),
            "Mismatch between the number of input (3) and output (2) files"
        );
    }

    #[test]
    fn test_batch_fatal_classification() {
        assert!(!HarnessError::MalformedInput("x".into()).is_batch_fatal());
        assert!(!HarnessError::RunFailure("x".into()).is_batch_fatal());
        assert!(HarnessError::CompileFailure("x".into()).is_batch_fatal());
        assert!(HarnessError::UnsupportedLanguage("rb".into()).is_batch_fatal());
    }
}
