//! Problem identity and run context
//!
//! A `Session` is created once the user names a problem and is passed
//! explicitly to everything that needs the case directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::HarnessError;

const CASES_DIR: &str = "test_cases";

/// Problem slug, e.g. `two-sum`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemSlug(String);

impl ProblemSlug {
    /// Accepts a problem URL (`.../problems/<slug>/...`) or a bare slug
    pub fn parse(text: &str) -> Result<Self, HarnessError> {
        static URL: OnceLock<Regex> = OnceLock::new();
        static BARE: OnceLock<Regex> = OnceLock::new();

        let text = text.trim();
        let url = URL.get_or_init(|| {
            Regex::new(r"(?i)/problems/([a-z0-9-]+)").expect("static pattern is valid")
        });
        if let Some(slug) = url.captures(text).and_then(|caps| caps.get(1)) {
            return Ok(Self(slug.as_str().to_lowercase()));
        }

        let bare = BARE.get_or_init(|| Regex::new(r"(?i)^[a-z0-9-]+$").expect("static pattern is valid"));
        if bare.is_match(text) {
            return Ok(Self(text.to_lowercase()));
        }

        Err(HarnessError::InvalidProblem(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit context for one problem in one workspace
#[derive(Debug, Clone)]
pub struct Session {
    pub workspace: PathBuf,
    pub problem: ProblemSlug,
}

impl Session {
    pub fn new(workspace: impl AsRef<Path>, problem: ProblemSlug) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
            problem,
        }
    }

    /// Directory holding this problem's `ip*.txt` / `op*.txt` files
    pub fn case_dir(&self) -> PathBuf {
        self.workspace.join(CASES_DIR).join(self.problem.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_url() {
        let slug = ProblemSlug::parse("https://leetcode.com/problems/two-sum/description/").unwrap();
        assert_eq!(slug.as_str(), "two-sum");

        let slug = ProblemSlug::parse("https://leetcode.com/Problems/Find-The-Duplicate-Number").unwrap();
        assert_eq!(slug.as_str(), "find-the-duplicate-number");
    }

    #[test]
    fn test_bare_slug() {
        assert_eq!(ProblemSlug::parse(" two-sum ").unwrap().to_string(), "two-sum");
    }

    #[test]
    fn test_invalid_problem() {
        assert!(matches!(
            ProblemSlug::parse("https://example.com/contest/1"),
            Err(HarnessError::InvalidProblem(_))
        ));
        assert!(ProblemSlug::parse("").is_err());
    }

    #[test]
    fn test_case_dir() {
        let session = Session::new("/ws", ProblemSlug::parse("two-sum").unwrap());
        assert_eq!(session.case_dir(), PathBuf::from("/ws/test_cases/two-sum"));
    }
}
