//! selfjudge - run a solution file against stored test cases
//!
//! The harness compiles a solution at most once, feeds every case's input
//! to a fresh process and compares trimmed stdout against the expected
//! output, reporting one verdict per case.

pub mod compiler;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod judger;
pub mod languages;
pub mod normalizer;
pub mod runner;
pub mod session;
pub mod testcases;
pub mod verdict;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use host::{ConsolePrompt, ConsoleReporter, MemoryReporter, Prompt, Reporter};
pub use judger::Judger;
pub use languages::{LanguageConfig, LanguageRegistry, Solution};
pub use runner::{LocalRunner, Runner};
pub use session::{ProblemSlug, Session};
pub use testcases::{load_cases, save_case, CaseFiles, TestCase};
pub use verdict::Verdict;
