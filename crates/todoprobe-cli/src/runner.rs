//! Command implementations

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use std::fmt::Write as _;
use std::time::Duration;
use todoprobe::{
    all_groups, AppDefect, MutationRun, ProbeDriver, ReportFormat, RetryConfig, Session, SimulatedApp,
    SuiteConfig, SuiteReport,
};
use tracing::info;

/// Report file name for a format
#[must_use]
pub const fn report_file_name(format: ReportFormat) -> &'static str {
    match format {
        ReportFormat::Text => "report.txt",
        ReportFormat::Json => "report.json",
        ReportFormat::Junit => "junit.xml",
    }
}

/// Runs CLI commands against a resolved configuration
#[derive(Debug)]
pub struct CommandRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl CommandRunner {
    /// Create a runner; the reporter follows the color and quiet settings
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Run the suite; `Ok(true)` when every scenario passed
    pub async fn run(&mut self, simulated: bool) -> CliResult<bool> {
        let suite = self.config.suite.clone();
        let driver = open_driver(&suite, simulated).await?;
        let mut session =
            Session::new(driver, suite.base_url.clone()).with_retry(suite.retry_config());

        info!(base_url = %suite.base_url, driver = session.driver_name(), "running suite");
        let runner = suite.runner();
        let reporter = &mut self.reporter;
        let report = runner
            .run_with(&mut session, |event| reporter.on_event(event))
            .await;
        self.reporter.finish();

        if let Err(err) = session.close().await {
            tracing::warn!(error = %err, "driver did not close cleanly");
        }

        self.emit(&suite, &report)?;
        self.reporter.summary(&report);
        Ok(report.all_passed())
    }

    /// Write the report file, or print non-text formats to stdout
    fn emit(&self, suite: &SuiteConfig, report: &SuiteReport) -> CliResult<()> {
        match &suite.output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(report_file_name(suite.format));
                report.write(&path, suite.format)?;
                self.reporter.info(&format!("report written to {}", path.display()));
            }
            None if suite.format != ReportFormat::Text => {
                println!("{}", report.render(suite.format)?);
            }
            None => {}
        }
        Ok(())
    }

    /// Run every app defect against the simulated app; `Ok(true)` when all
    /// were caught
    pub async fn mutants(&mut self, timeout_ms: Option<u64>) -> CliResult<bool> {
        let mut retry = RetryConfig::fast();
        if let Some(ms) = timeout_ms {
            if ms == 0 {
                return Err(CliError::invalid_argument("--timeout must be positive"));
            }
            retry = RetryConfig::new(Duration::from_millis(ms))
                .with_poll_interval(retry.poll_interval.min(Duration::from_millis(ms)));
        }

        let run = MutationRun::new().with_retry(retry);
        self.reporter.start_progress(AppDefect::ALL.len() as u64, "mutants");
        let reporter = &self.reporter;
        let report = run
            .run_with(|result| {
                reporter.set_message(result.defect.name());
                reporter.increment(1);
            })
            .await;
        self.reporter.finish();

        info!(
            killed = report.score().killed,
            total = report.score().total_mutants,
            "mutation run finished"
        );
        self.reporter.mutation_summary(&report);
        Ok(report.all_killed())
    }

    /// Effective configuration as YAML
    pub fn config_yaml(&self) -> CliResult<String> {
        Ok(self.config.suite.to_yaml()?)
    }
}

/// Scenario listing, one group per block
#[must_use]
pub fn list_scenarios() -> String {
    let mut out = String::new();
    for group in all_groups() {
        let hook = if group.before_each.is_some() {
            " (before each: default todos)"
        } else {
            ""
        };
        let _ = writeln!(out, "{}{hook}", group.name);
        for scenario in &group.scenarios {
            let _ = writeln!(out, "  {}", scenario.name);
        }
    }
    out
}

async fn open_driver(suite: &SuiteConfig, simulated: bool) -> CliResult<Box<dyn ProbeDriver>> {
    if simulated {
        return Ok(Box::new(SimulatedApp::new()));
    }
    launch_browser(suite).await
}

#[cfg(feature = "browser")]
async fn launch_browser(suite: &SuiteConfig) -> CliResult<Box<dyn ProbeDriver>> {
    let driver = todoprobe::ChromiumDriver::launch(&suite.browser).await?;
    Ok(Box::new(driver))
}

#[cfg(not(feature = "browser"))]
async fn launch_browser(_suite: &SuiteConfig) -> CliResult<Box<dyn ProbeDriver>> {
    Err(CliError::config(
        "built without the `browser` feature; pass --simulated",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorChoice, Verbosity};

    fn quiet_config() -> CliConfig {
        CliConfig::new()
            .with_verbosity(Verbosity::Quiet)
            .with_color(ColorChoice::Never)
    }

    #[test]
    fn test_list_scenarios() {
        let listing = list_scenarios();
        assert!(listing.starts_with("Initial page\n  focuses the todo input\n"));
        assert!(listing.contains("Routing (before each: default todos)"));
        assert_eq!(listing.lines().filter(|l| l.starts_with("  ")).count(), 26);
    }

    #[test]
    fn test_report_file_names() {
        assert_eq!(report_file_name(ReportFormat::Junit), "junit.xml");
        assert_eq!(report_file_name(ReportFormat::Json), "report.json");
    }

    #[tokio::test]
    async fn test_simulated_run_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = quiet_config();
        config.suite.output_dir = Some(dir.path().to_path_buf());
        config.suite.format = ReportFormat::Junit;
        config.suite.filter = Some("Add todo".into());
        config.suite.command_timeout_ms = 200;
        config.suite.poll_interval_ms = 5;

        let passed = CommandRunner::new(config).run(true).await.unwrap();
        assert!(passed);
        let xml = std::fs::read_to_string(dir.path().join("junit.xml")).unwrap();
        assert!(xml.contains(r#"tests="5" failures="0""#));
    }

    #[tokio::test]
    async fn test_mutants_rejects_zero_timeout() {
        let err = CommandRunner::new(quiet_config())
            .mutants(Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_config_yaml() {
        let yaml = CommandRunner::new(quiet_config()).config_yaml().unwrap();
        assert!(yaml.contains("localhost:8080"));
        assert!(yaml.contains("command_timeout_ms: 4000"));
    }
}
