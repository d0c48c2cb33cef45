//! Test case storage
//!
//! One problem per directory; inputs are `ip<N>.txt`, expected outputs are
//! `op<N>.txt`, ordered by `N`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::error::HarnessError;

const INPUT_PREFIX: &str = "ip";
const OUTPUT_PREFIX: &str = "op";
const CASE_EXTENSION: &str = ".txt";

/// One (input, expected output) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// 1-based position, stable for the whole run
    pub index: usize,
    pub input: String,
    pub expected_output: String,
}

/// Pair inputs with outputs by position
pub fn pair_cases(inputs: Vec<String>, outputs: Vec<String>) -> Result<Vec<TestCase>, HarnessError> {
    if inputs.len() != outputs.len() {
        return Err(HarnessError::StructureMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }

    Ok(inputs
        .into_iter()
        .zip(outputs)
        .enumerate()
        .map(|(i, (input, expected_output))| TestCase {
            index: i + 1,
            input,
            expected_output,
        })
        .collect())
}

/// Raw case blobs read from a problem directory, not yet paired
#[derive(Debug, Default)]
pub struct CaseFiles {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Read every `ip*.txt` / `op*.txt` in `dir`, each trimmed at the edges
pub async fn load_cases(dir: &Path) -> Result<CaseFiles, HarnessError> {
    if !fs::try_exists(dir).await.unwrap_or(false) {
        return Err(HarnessError::CasesNotFound(dir.to_path_buf()));
    }

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.ends_with(CASE_EXTENSION) {
            continue;
        }
        if name.starts_with(INPUT_PREFIX) {
            inputs.push((case_number(&name, INPUT_PREFIX), name, entry.path()));
        } else if name.starts_with(OUTPUT_PREFIX) {
            outputs.push((case_number(&name, OUTPUT_PREFIX), name, entry.path()));
        }
    }

    // numbered files first in numeric order, anything else by name
    inputs.sort_by(|a, b| (a.0.is_none(), a.0, &a.1).cmp(&(b.0.is_none(), b.0, &b.1)));
    outputs.sort_by(|a, b| (a.0.is_none(), a.0, &a.1).cmp(&(b.0.is_none(), b.0, &b.1)));

    let files = CaseFiles {
        inputs: read_all(inputs.into_iter().map(|(_, _, p)| p)).await?,
        outputs: read_all(outputs.into_iter().map(|(_, _, p)| p)).await?,
    };

    debug!(
        "Loaded {} inputs and {} outputs from {}",
        files.inputs.len(),
        files.outputs.len(),
        dir.display()
    );
    Ok(files)
}

/// Append the next `ipN.txt` / `opN.txt` pair to `dir`, returning its number
pub async fn save_case(dir: &Path, input: &str, output: &str) -> Result<usize, HarnessError> {
    fs::create_dir_all(dir).await?;

    let mut highest = 0;
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(n) = case_number(&name, INPUT_PREFIX).or_else(|| case_number(&name, OUTPUT_PREFIX)) {
            highest = highest.max(n);
        }
    }

    let number = highest + 1;
    fs::write(case_path(dir, INPUT_PREFIX, number), input).await?;
    fs::write(case_path(dir, OUTPUT_PREFIX, number), output).await?;

    info!("Saved test case {} in {}", number, dir.display());
    Ok(number)
}

fn case_path(dir: &Path, prefix: &str, number: usize) -> PathBuf {
    dir.join(format!("{}{}{}", prefix, number, CASE_EXTENSION))
}

fn case_number(name: &str, prefix: &str) -> Option<usize> {
    name.strip_prefix(prefix)?
        .strip_suffix(CASE_EXTENSION)?
        .parse()
        .ok()
}

async fn read_all(paths: impl Iterator<Item = PathBuf>) -> Result<Vec<String>, HarnessError> {
    let mut blobs = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path).await?;
        blobs.push(content.trim().to_string());
    }
    Ok(blobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_cases_indexes_from_one() {
        let cases = pair_cases(
            vec!["a".into(), "b".into()],
            vec!["A".into(), "B".into()],
        )
        .unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].index, 1);
        assert_eq!(cases[1].input, "b");
        assert_eq!(cases[1].expected_output, "B");
    }

    #[test]
    fn test_pair_cases_count_mismatch() {
        let err = pair_cases(vec!["a".into()], vec![]).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::StructureMismatch {
                inputs: 1,
                outputs: 0
            }
        ));
    }

    #[tokio::test]
    async fn test_load_orders_numerically_and_trims() {
        let dir = tempfile::tempdir().unwrap();
        for n in [1, 2, 10] {
            std::fs::write(dir.path().join(format!("ip{}.txt", n)), format!(" in{}\n", n)).unwrap();
            std::fs::write(dir.path().join(format!("op{}.txt", n)), format!("out{}\n\n", n)).unwrap();
        }
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let files = load_cases(dir.path()).await.unwrap();
        assert_eq!(files.inputs, vec!["in1", "in2", "in10"]);
        assert_eq!(files.outputs, vec!["out1", "out2", "out10"]);
    }

    #[tokio::test]
    async fn test_load_keeps_unequal_counts_for_the_judger() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ip1.txt"), "1").unwrap();
        std::fs::write(dir.path().join("ip2.txt"), "2").unwrap();
        std::fs::write(dir.path().join("op1.txt"), "1").unwrap();

        let files = load_cases(dir.path()).await.unwrap();
        assert_eq!(files.inputs.len(), 2);
        assert_eq!(files.outputs.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_cases(&dir.path().join("two-sum")).await.unwrap_err();
        assert!(matches!(err, HarnessError::CasesNotFound(_)));
    }

    #[tokio::test]
    async fn test_save_case_appends_next_number() {
        let dir = tempfile::tempdir().unwrap();
        let problem = dir.path().join("two-sum");

        assert_eq!(save_case(&problem, "[2, 7]", "[0, 1]").await.unwrap(), 1);
        assert_eq!(save_case(&problem, "[3, 3]", "[0, 1]").await.unwrap(), 2);

        assert_eq!(std::fs::read_to_string(problem.join("ip2.txt")).unwrap(), "[3, 3]");
        let files = load_cases(&problem).await.unwrap();
        assert_eq!(files.inputs, vec!["[2, 7]", "[3, 3]"]);
    }
}
