//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use todoprobe::{MutationReport, RunEvent, ScenarioOutcome, ScenarioStatus, SuiteReport};

/// Progress reporter for suite runs
///
/// Lines go to stderr so stdout stays clean for the report itself.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Feed a runner event
    pub fn on_event(&mut self, event: RunEvent<'_>) {
        match event {
            RunEvent::Started { total } => {
                self.start_progress(total as u64, "starting");
            }
            RunEvent::ScenarioStarted { group, name } => {
                self.set_message(&format!("{group} / {name}"));
            }
            RunEvent::ScenarioFinished(outcome) => {
                self.outcome(outcome);
                self.increment(1);
            }
        }
    }

    /// Print one scenario outcome
    pub fn outcome(&self, outcome: &ScenarioOutcome) {
        let line = format!(
            "{} ({}ms)",
            outcome.qualified_name(),
            outcome.duration.as_millis()
        );
        match outcome.status {
            ScenarioStatus::Passed => self.success(&line),
            ScenarioStatus::Failed => {
                self.failure(&line);
                if let Some(error) = &outcome.error {
                    self.detail(error);
                }
                if let Some(path) = &outcome.screenshot {
                    self.detail(&format!("screenshot: {}", path.display()));
                }
            }
            ScenarioStatus::Skipped => self.skipped(&outcome.qualified_name()),
        }
    }

    fn write_line(&self, line: &str) {
        match &self.progress_bar {
            Some(pb) => pb.println(line),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    fn skipped(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("-").yellow().to_string()
        } else {
            "SKIP".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    fn detail(&self, message: &str) {
        let text = if self.use_color {
            style(message).dim().to_string()
        } else {
            message.to_string()
        };
        self.write_line(&format!("    {text}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print run summary
    pub fn summary(&self, report: &SuiteReport) {
        let failed = report.failed_count();
        if self.quiet && failed == 0 {
            return;
        }

        let passed = report.passed_count();
        let skipped = report.skipped_count();
        let total = report.total_count();
        let duration_secs = report.duration.as_secs_f64();

        let _ = self.term.write_line("");

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            let _ = self.term.write_line(&format!(
                "{} {} scenarios in {:.2}s ({} passed, {} failed, {} skipped)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped)
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {total} scenarios in {duration_secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped)"
            ));
        }
    }

    /// Print the mutation table; quiet mode prints it only when a defect survived
    pub fn mutation_summary(&self, report: &MutationReport) {
        if self.quiet && report.all_killed() {
            return;
        }
        let _ = self.term.write_line("");
        for line in report.render_text().lines() {
            let _ = self.term.write_line(line);
        }
    }
}
