//! Suite reports: text summary, JSON and JUnit XML.

use crate::result::{ProbeError, ProbeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Scenario result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Scenario passed
    Passed,
    /// Scenario failed
    Failed,
    /// Scenario was not run (fail-fast)
    Skipped,
}

impl ScenarioStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Skipped => "SKIP",
        }
    }
}

/// Individual scenario result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Group name
    pub group: String,
    /// Scenario name
    pub name: String,
    /// Result status
    pub status: ScenarioStatus,
    /// Duration of the scenario including setup
    pub duration: Duration,
    /// Error message if failed
    pub error: Option<String>,
    /// Screenshot written on failure
    pub screenshot: Option<PathBuf>,
}

impl ScenarioOutcome {
    /// Create a passing result
    #[must_use]
    pub fn passed(group: impl Into<String>, name: impl Into<String>, duration: Duration) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            status: ScenarioStatus::Passed,
            duration,
            error: None,
            screenshot: None,
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn failed(
        group: impl Into<String>,
        name: impl Into<String>,
        duration: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            status: ScenarioStatus::Failed,
            duration,
            error: Some(error.into()),
            screenshot: None,
        }
    }

    /// Create a skipped result
    #[must_use]
    pub fn skipped(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            status: ScenarioStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            screenshot: None,
        }
    }

    /// Attach a screenshot path
    #[must_use]
    pub fn with_screenshot(mut self, path: PathBuf) -> Self {
        self.screenshot = Some(path);
        self
    }

    /// `"group / scenario"`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{} / {}", self.group, self.name)
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON document
    Json,
    /// JUnit XML for CI
    Junit,
}

impl FromStr for ReportFormat {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "junit" | "xml" => Ok(Self::Junit),
            other => Err(ProbeError::ConfigError {
                message: format!("unknown report format {other:?}"),
            }),
        }
    }
}

/// Results of one suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique run identifier
    pub run_id: Uuid,
    /// Suite name
    pub suite_name: String,
    /// Driver the suite ran against
    pub driver: String,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Total duration
    pub duration: Duration,
    /// Outcomes in run order
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    /// Start an empty report
    #[must_use]
    pub fn new(suite_name: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            suite_name: suite_name.into(),
            driver: driver.into(),
            started_at: Utc::now(),
            duration: Duration::ZERO,
            outcomes: Vec::new(),
        }
    }

    /// Record an outcome
    pub fn record(&mut self, outcome: ScenarioOutcome) {
        self.outcomes.push(outcome);
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Count skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    /// No failures and nothing skipped
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_passed())
    }

    /// Get failed outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_failed())
            .collect()
    }

    /// Generate summary string
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {} passed, {} failed, {} skipped ({} total) in {:.2}s",
            self.suite_name,
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_count(),
            self.duration.as_secs_f64()
        )
    }

    /// Render in the requested format
    ///
    /// # Errors
    ///
    /// Returns error if JSON serialization fails
    pub fn render(&self, format: ReportFormat) -> ProbeResult<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(),
            ReportFormat::Junit => Ok(self.render_junit()),
        }
    }

    /// Write the report to a file
    ///
    /// # Errors
    ///
    /// Returns error if rendering or file writing fails
    pub fn write(&self, path: &Path, format: ReportFormat) -> ProbeResult<()> {
        std::fs::write(path, self.render(format)?)?;
        Ok(())
    }

    /// Render the plain-text summary
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let mut group = "";
        for outcome in &self.outcomes {
            if outcome.group != group {
                group = &outcome.group;
                let _ = writeln!(out, "{group}");
            }
            let _ = writeln!(
                out,
                "  {} {} ({}ms)",
                outcome.status.label(),
                outcome.name,
                outcome.duration.as_millis()
            );
            if let Some(error) = &outcome.error {
                let _ = writeln!(out, "       {error}");
            }
            if let Some(path) = &outcome.screenshot {
                let _ = writeln!(out, "       screenshot: {}", path.display());
            }
        }
        let _ = writeln!(out, "\n{}", self.summary());
        out
    }

    /// Render as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn render_json(&self) -> ProbeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        let _ = writeln!(
            xml,
            r#"<testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}" timestamp="{}">"#,
            escape_xml(&self.suite_name),
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.duration.as_secs_f64(),
            self.started_at.format("%Y-%m-%dT%H:%M:%S")
        );

        for outcome in &self.outcomes {
            let _ = writeln!(
                xml,
                r#"  <testcase classname="{}" name="{}" time="{:.3}">"#,
                escape_xml(&outcome.group),
                escape_xml(&outcome.name),
                outcome.duration.as_secs_f64()
            );

            match outcome.status {
                ScenarioStatus::Failed => {
                    let error = outcome.error.as_deref().unwrap_or_default();
                    let _ = writeln!(
                        xml,
                        r#"    <failure message="{}">{}</failure>"#,
                        escape_xml(error),
                        escape_xml(error)
                    );
                }
                ScenarioStatus::Skipped => xml.push_str("    <skipped/>\n"),
                ScenarioStatus::Passed => {}
            }

            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
