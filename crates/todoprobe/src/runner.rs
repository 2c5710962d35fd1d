//! Scenario runner.
//!
//! Runs groups in order against one [`Session`]. Every scenario starts from a
//! fresh page, then the group's before-each hook, then the body. A failure
//! ends that scenario only, unless the runner is in Andon Cord mode.

use crate::reporter::{ScenarioOutcome, SuiteReport};
use crate::result::ProbeResult;
use crate::scenarios::{all_groups, Scenario, ScenarioGroup};
use crate::session::Session;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Suite name used in reports
pub const SUITE_NAME: &str = "TodoMVC";

/// Failure mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Keep going after failures
    #[default]
    CollectAll,
    /// Stop at the first failure and skip the rest
    AndonCord,
}

/// Progress notifications emitted while running
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    /// Run is starting with this many selected scenarios
    Started {
        /// Selected scenario count
        total: usize,
    },
    /// A scenario is about to start
    ScenarioStarted {
        /// Group name
        group: &'a str,
        /// Scenario name
        name: &'a str,
    },
    /// A scenario finished (or was skipped)
    ScenarioFinished(&'a ScenarioOutcome),
}

/// Runs the scenario set and collects a [`SuiteReport`]
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    groups: Vec<ScenarioGroup>,
    filter: Option<String>,
    failure_mode: FailureMode,
    output_dir: Option<PathBuf>,
}

impl Default for SuiteRunner {
    fn default() -> Self {
        Self::new(all_groups())
    }
}

impl SuiteRunner {
    /// Create a runner over explicit groups
    #[must_use]
    pub fn new(groups: Vec<ScenarioGroup>) -> Self {
        Self {
            groups,
            filter: None,
            failure_mode: FailureMode::CollectAll,
            output_dir: None,
        }
    }

    /// Only run scenarios whose `"group / scenario"` name contains `pattern`
    /// (case-insensitive)
    #[must_use]
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.filter = (!pattern.is_empty()).then(|| pattern.to_lowercase());
        self
    }

    /// Stop after the first failure
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.failure_mode = if fail_fast {
            FailureMode::AndonCord
        } else {
            FailureMode::CollectAll
        };
        self
    }

    /// Directory for failure screenshots
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Get failure mode
    #[must_use]
    pub const fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Scenarios the filter selects, in run order
    #[must_use]
    pub fn selected(&self) -> Vec<(&ScenarioGroup, &Scenario)> {
        self.groups
            .iter()
            .flat_map(|g| g.scenarios.iter().map(move |s| (g, s)))
            .filter(|(g, s)| {
                self.filter
                    .as_ref()
                    .map_or(true, |f| g.qualified_name(s).to_lowercase().contains(f))
            })
            .collect()
    }

    /// Run without progress notifications
    pub async fn run(&self, session: &mut Session) -> SuiteReport {
        self.run_with(session, |_| {}).await
    }

    /// Run, reporting progress through `on_event`
    pub async fn run_with<F>(&self, session: &mut Session, mut on_event: F) -> SuiteReport
    where
        F: FnMut(RunEvent<'_>),
    {
        let selected = self.selected();
        let mut report = SuiteReport::new(SUITE_NAME, session.driver_name());
        let started = Instant::now();
        let mut stopped = false;

        info!(
            total = selected.len(),
            driver = session.driver_name(),
            base_url = session.base_url(),
            "suite started"
        );
        on_event(RunEvent::Started {
            total: selected.len(),
        });

        for (group, scenario) in selected {
            let outcome = if stopped {
                ScenarioOutcome::skipped(group.name, scenario.name)
            } else {
                on_event(RunEvent::ScenarioStarted {
                    group: group.name,
                    name: scenario.name,
                });
                let outcome = self.run_one(session, group, scenario).await;
                if outcome.status.is_failed() && self.failure_mode == FailureMode::AndonCord {
                    warn!("fail-fast: skipping remaining scenarios");
                    stopped = true;
                }
                outcome
            };
            on_event(RunEvent::ScenarioFinished(&outcome));
            report.record(outcome);
        }

        report.duration = started.elapsed();
        info!(summary = %report.summary(), "suite finished");
        report
    }

    async fn run_one(
        &self,
        session: &mut Session,
        group: &ScenarioGroup,
        scenario: &Scenario,
    ) -> ScenarioOutcome {
        let qualified = group.qualified_name(scenario);
        let start = Instant::now();
        let result = execute(session, group, scenario).await;
        let duration = start.elapsed();

        match result {
            Ok(()) => {
                info!(scenario = %qualified, ms = duration.as_millis(), "passed");
                ScenarioOutcome::passed(group.name, scenario.name, duration)
            }
            Err(err) => {
                warn!(scenario = %qualified, error = %err, "failed");
                let outcome =
                    ScenarioOutcome::failed(group.name, scenario.name, duration, err.to_string());
                match self.capture(session, &qualified).await {
                    Some(path) => outcome.with_screenshot(path),
                    None => outcome,
                }
            }
        }
    }

    /// Write a failure screenshot; problems are logged, never fatal
    async fn capture(&self, session: &Session, qualified: &str) -> Option<PathBuf> {
        let dir = self.output_dir.as_ref()?.join("screenshots");
        let bytes = match session.screenshot().await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return None,
            Err(err) => {
                warn!(error = %err, "screenshot capture failed");
                return None;
            }
        };
        let path = dir.join(format!("{}.png", slug(qualified)));
        match write_file(&dir, &path, &bytes) {
            Ok(()) => Some(path),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "screenshot not written");
                None
            }
        }
    }
}

async fn execute(
    session: &mut Session,
    group: &ScenarioGroup,
    scenario: &Scenario,
) -> ProbeResult<()> {
    session.fresh_page().await?;
    if let Some(hook) = group.before_each {
        hook(session).await?;
    }
    (scenario.body)(session).await
}

fn write_file(dir: &Path, path: &Path, bytes: &[u8]) -> ProbeResult<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// File-name-safe form of a scenario name
#[must_use]
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}
