//! Judger module - batch execution of a solution against its test cases
//!
//! Preconditions (paired case counts, known language) are checked before any
//! process starts. Compiled languages are built exactly once; cases then run
//! strictly one after another against that single artifact.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::compiler::compile_solution;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::evaluator::{evaluate_case, CaseContext};
use crate::host::Reporter;
use crate::languages::{LanguageRegistry, Solution};
use crate::runner::Runner;
use crate::testcases::{pair_cases, CaseFiles, TestCase};
use crate::verdict::{summary_line, Verdict};

/// Runs batches of test cases; holds no per-batch state, so independent
/// batches may share one `Judger`
pub struct Judger {
    registry: LanguageRegistry,
    runner: Arc<dyn Runner>,
    config: HarnessConfig,
}

impl Judger {
    pub fn new(registry: LanguageRegistry, runner: Arc<dyn Runner>, config: HarnessConfig) -> Self {
        Self {
            registry,
            runner,
            config,
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Pair raw case files and judge `solution` against them
    ///
    /// Batch-level failures are reported once through `reporter` and
    /// returned with no verdicts.
    pub async fn run(
        &self,
        solution: &Path,
        files: CaseFiles,
        reporter: &dyn Reporter,
    ) -> Result<Vec<Verdict>, HarnessError> {
        let cases = match pair_cases(files.inputs, files.outputs) {
            Ok(cases) => cases,
            Err(e) => {
                warn!("Rejecting batch: {}", e);
                reporter.line(&e.to_string());
                return Err(e);
            }
        };

        self.run_cases(&Solution::new(solution), &cases, reporter).await
    }

    /// Judge `solution` against already paired cases, in ascending index order
    pub async fn run_cases(
        &self,
        solution: &Solution,
        cases: &[TestCase],
        reporter: &dyn Reporter,
    ) -> Result<Vec<Verdict>, HarnessError> {
        match self.judge(solution, cases, reporter).await {
            Ok(verdicts) => Ok(verdicts),
            Err(e) => {
                warn!("Batch aborted for {}: {}", solution.path.display(), e);
                reporter.line(&e.to_string());
                Err(e)
            }
        }
    }

    async fn judge(
        &self,
        solution: &Solution,
        cases: &[TestCase],
        reporter: &dyn Reporter,
    ) -> Result<Vec<Verdict>, HarnessError> {
        let language = self.registry.strategy_for(solution)?;

        info!(
            "Judging {} as {} against {} test cases",
            solution.path.display(),
            language.name,
            cases.len()
        );

        // kept alive until every case has run; scoped artifacts are removed on drop
        let compilation = compile_solution(self.runner.as_ref(), language, &solution.path, &self.config).await?;
        if let Some(compilation) = &compilation {
            reporter.line("Compilation successful");
            if let Some(warnings) = &compilation.warnings {
                reporter.line(warnings);
            }
        }

        let limits = self.config.run_limits();
        let ctx = CaseContext {
            runner: self.runner.as_ref(),
            language,
            source: &solution.path,
            artifact: compilation.as_ref().map(|c| &c.artifact),
            limits: &limits,
        };

        let mut ordered: Vec<&TestCase> = cases.iter().collect();
        ordered.sort_by_key(|case| case.index);

        let mut verdicts = Vec::with_capacity(ordered.len());
        for case in ordered {
            let verdict = evaluate_case(&ctx, case).await;
            for line in verdict.report_lines() {
                reporter.line(&line);
            }
            verdicts.push(verdict);
        }

        let summary = summary_line(&verdicts);
        info!("{}", summary);
        reporter.line(&summary);

        Ok(verdicts)
    }
}
