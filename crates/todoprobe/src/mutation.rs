//! Mutation runs: how many injected app defects does the scenario set catch?
//!
//! A baseline run against the healthy [`SimulatedApp`] must pass. Then the
//! suite runs once per [`AppDefect`]; a defect is killed when at least one
//! scenario fails.

use crate::reporter::SuiteReport;
use crate::retry::RetryConfig;
use crate::runner::SuiteRunner;
use crate::session::Session;
use crate::simulated::{AppDefect, SimulatedApp};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{info, warn};

/// Base URL the simulated app is addressed by
const SIMULATED_BASE_URL: &str = "http://todoprobe.local";

/// Result of running the suite against one defect
#[derive(Debug, Clone, Serialize)]
pub struct MutantResult {
    /// Injected defect
    pub defect: AppDefect,
    /// Whether any scenario failed
    pub killed: bool,
    /// First failing scenario and its error
    pub kill_reason: Option<String>,
}

/// Mutation score summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MutationScore {
    /// Defects tried
    pub total_mutants: usize,
    /// Defects caught
    pub killed: usize,
    /// Defects missed
    pub survived: usize,
    /// killed / total
    pub score: f64,
}

/// Calculate mutation score from results
#[must_use]
pub fn calculate_mutation_score(results: &[MutantResult]) -> MutationScore {
    let total_mutants = results.len();
    let killed = results.iter().filter(|r| r.killed).count();
    let score = if total_mutants > 0 {
        killed as f64 / total_mutants as f64
    } else {
        1.0
    };
    MutationScore {
        total_mutants,
        killed,
        survived: total_mutants - killed,
        score,
    }
}

/// Baseline plus one result per defect
#[derive(Debug, Clone, Serialize)]
pub struct MutationReport {
    /// Suite run against the healthy app
    pub baseline: SuiteReport,
    /// Per-defect results
    pub results: Vec<MutantResult>,
}

impl MutationReport {
    /// Score over all defects
    #[must_use]
    pub fn score(&self) -> MutationScore {
        calculate_mutation_score(&self.results)
    }

    /// Defects no scenario caught
    #[must_use]
    pub fn survivors(&self) -> Vec<AppDefect> {
        self.results
            .iter()
            .filter(|r| !r.killed)
            .map(|r| r.defect)
            .collect()
    }

    /// Baseline passed and every defect was caught
    #[must_use]
    pub fn all_killed(&self) -> bool {
        self.baseline.all_passed() && self.results.iter().all(|r| r.killed)
    }

    /// Plain-text table
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "baseline: {}",
            if self.baseline.all_passed() {
                "passed"
            } else {
                "FAILED"
            }
        );
        for result in &self.results {
            let _ = writeln!(
                out,
                "  {:<8} {}",
                if result.killed { "killed" } else { "SURVIVED" },
                result.defect
            );
            if let Some(reason) = &result.kill_reason {
                let _ = writeln!(out, "           {reason}");
            }
        }
        let score = self.score();
        let _ = writeln!(
            out,
            "\nmutation score: {}/{} ({:.1}%)",
            score.killed,
            score.total_mutants,
            score.score * 100.0
        );
        out
    }
}

/// Runs the suite against the simulated app once per defect
#[derive(Debug, Clone)]
pub struct MutationRun {
    runner: SuiteRunner,
    retry: RetryConfig,
    defects: Vec<AppDefect>,
}

impl Default for MutationRun {
    fn default() -> Self {
        Self {
            runner: SuiteRunner::default(),
            retry: RetryConfig::fast(),
            defects: AppDefect::ALL.to_vec(),
        }
    }
}

impl MutationRun {
    /// Every defect, full suite, fast retries
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retry configuration
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Restrict to some defects
    #[must_use]
    pub fn with_defects(mut self, defects: impl IntoIterator<Item = AppDefect>) -> Self {
        self.defects = defects.into_iter().collect();
        self
    }

    /// Use a custom runner
    #[must_use]
    pub fn with_runner(mut self, runner: SuiteRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Run the baseline and every mutant
    pub async fn run(&self) -> MutationReport {
        self.run_with(|_| {}).await
    }

    /// Run, reporting each mutant result as it completes
    pub async fn run_with<F>(&self, mut on_result: F) -> MutationReport
    where
        F: FnMut(&MutantResult),
    {
        let baseline = self.run_against(SimulatedApp::new()).await;
        if !baseline.all_passed() {
            warn!(summary = %baseline.summary(), "baseline failed; mutants are meaningless");
        }

        let mut results = Vec::with_capacity(self.defects.len());
        for &defect in &self.defects {
            let report = self
                .run_against(SimulatedApp::new().with_defect(defect))
                .await;
            let kill_reason = report.failures().first().map(|f| {
                format!(
                    "{}: {}",
                    f.qualified_name(),
                    f.error.as_deref().unwrap_or_default()
                )
            });
            let result = MutantResult {
                defect,
                killed: kill_reason.is_some(),
                kill_reason,
            };
            if result.killed {
                info!(%defect, "killed");
            } else {
                warn!(%defect, "survived");
            }
            on_result(&result);
            results.push(result);
        }

        MutationReport { baseline, results }
    }

    async fn run_against(&self, app: SimulatedApp) -> SuiteReport {
        let mut session = Session::new(Box::new(app), SIMULATED_BASE_URL).with_retry(self.retry);
        self.runner.run(&mut session).await
    }
}
