//! Case evaluation
//!
//! Runs one test case against an already prepared solution and turns every
//! outcome, including errors, into a `Verdict`. Nothing in here aborts a
//! batch.

use std::path::Path;

use tracing::{debug, warn};

use crate::compiler::Artifact;
use crate::languages::LanguageConfig;
use crate::runner::{RunLimits, RunOutcome, Runner};
use crate::testcases::TestCase;
use crate::verdict::Verdict;

/// Everything a case needs besides the case itself
pub struct CaseContext<'a> {
    pub runner: &'a dyn Runner,
    pub language: &'a LanguageConfig,
    pub source: &'a Path,
    pub artifact: Option<&'a Artifact>,
    pub limits: &'a RunLimits,
}

/// Evaluate one case: normalize input, run, compare trimmed outputs
pub async fn evaluate_case(ctx: &CaseContext<'_>, case: &TestCase) -> Verdict {
    let input = match ctx.language.input_format.apply(&case.input) {
        Ok(input) => input,
        Err(e) => {
            warn!("Test case {}: {}", case.index, e);
            return Verdict::error(case.index, &case.expected_output, e.to_string());
        }
    };

    let invocation = match ctx.language.run_invocation(ctx.source, ctx.artifact) {
        Ok(invocation) => invocation,
        Err(e) => return Verdict::error(case.index, &case.expected_output, e.to_string()),
    };

    debug!("Test case {}: running {}", case.index, invocation.describe());

    let outcome = match ctx.runner.run(&invocation, ctx.limits, Some(&input)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Test case {}: run failed: {:#}", case.index, e);
            return Verdict::error(case.index, &case.expected_output, format!("{:#}", e));
        }
    };

    let actual = outcome.stdout.trim().to_string();
    let expected = case.expected_output.trim().to_string();
    let passed = outcome.is_success() && compare_output(&actual, &expected);

    debug!(
        "Test case {}: {} in {}ms, passed={}",
        case.index, outcome.status, outcome.elapsed_ms, passed
    );

    Verdict {
        case_index: case.index,
        passed,
        actual_output: actual,
        expected_output: expected,
        diagnostic: diagnostic(&outcome),
    }
}

/// Compare program output with expected output
///
/// Only leading and trailing whitespace is ignored; everything in between
/// must match exactly.
pub fn compare_output(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}

/// Abnormal exit status and stderr text, if any
fn diagnostic(outcome: &RunOutcome) -> Option<String> {
    let stderr = outcome.stderr.trim();

    match (outcome.is_success(), stderr.is_empty()) {
        (true, true) => None,
        (true, false) => Some(stderr.to_string()),
        (false, true) => Some(format!("Process {}", outcome.status)),
        (false, false) => Some(format!("Process {}: {}", outcome.status, stderr)),
    }
}
