//! Per-case verdicts and the report lines built from them

use serde::{Deserialize, Serialize};

/// Pass/fail outcome of one test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// 1-based case number
    pub case_index: usize,
    pub passed: bool,
    /// Program output, trimmed at the edges
    pub actual_output: String,
    /// Expected output, trimmed at the edges
    pub expected_output: String,
    /// Why the case could not pass cleanly (run error, stderr, bad input)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl Verdict {
    /// Failed verdict for a case that never produced output
    pub fn error(case_index: usize, expected: &str, diagnostic: impl Into<String>) -> Self {
        Self {
            case_index,
            passed: false,
            actual_output: String::new(),
            expected_output: expected.trim().to_string(),
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Human-readable report lines for this case
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(diagnostic) = &self.diagnostic {
            lines.push(format!(
                "Error running code for test case {}: {}",
                self.case_index, diagnostic
            ));
        }

        if self.passed {
            lines.push(format!("Test case {} PASSED!", self.case_index));
        } else {
            lines.push(format!("Test case {} FAILED!", self.case_index));
            lines.push(format!("Expected: {}", self.expected_output));
            lines.push(format!("Received: {}", self.actual_output));
        }

        lines
    }
}

/// Closing summary line for a batch
pub fn summary_line(verdicts: &[Verdict]) -> String {
    let passed = verdicts.iter().filter(|v| v.passed).count();
    format!("Passed {}/{} test cases", passed, verdicts.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lines_for_failure() {
        let verdict = Verdict {
            case_index: 2,
            passed: false,
            actual_output: "5 6".into(),
            expected_output: "5".into(),
            diagnostic: None,
        };
        assert_eq!(
            verdict.report_lines(),
            vec!["Test case 2 FAILED!", "Expected: 5", "Received: 5 6"]
        );
    }

    #[test]
    fn test_report_lines_with_diagnostic() {
        let verdict = Verdict::error(1, " 3\n", "exited with code 1");
        let lines = verdict.report_lines();
        assert_eq!(lines[0], "Error running code for test case 1: exited with code 1");
        assert_eq!(lines[1], "Test case 1 FAILED!");
        assert_eq!(lines[2], "Expected: 3");
    }

    #[test]
    fn test_summary_and_json() {
        let verdicts = vec![
            Verdict {
                case_index: 1,
                passed: true,
                actual_output: "hello".into(),
                expected_output: "hello".into(),
                diagnostic: None,
            },
            Verdict::error(2, "x", "timed out"),
        ];
        assert_eq!(summary_line(&verdicts), "Passed 1/2 test cases");

        let json = serde_json::to_value(&verdicts[0]).unwrap();
        assert_eq!(json["case_index"], 1);
        assert!(json.get("diagnostic").is_none());
    }
}
