//! Suite configuration, loadable from YAML.
//!
//! ```yaml
//! base_url: http://localhost:8080
//! command_timeout_ms: 4000
//! poll_interval_ms: 50
//! fail_fast: false
//! browser:
//!   headless: true
//!   sandbox: false
//! ```

use crate::driver::BrowserConfig;
use crate::reporter::ReportFormat;
use crate::result::{ProbeError, ProbeResult};
use crate::retry::{RetryConfig, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::runner::SuiteRunner;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default application URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Everything a suite run needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Application root URL
    pub base_url: String,
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// How long actions and assertions keep retrying
    pub command_timeout_ms: u64,
    /// Delay between retries
    pub poll_interval_ms: u64,
    /// Report and screenshot directory
    pub output_dir: Option<PathBuf>,
    /// Report format
    pub format: ReportFormat,
    /// Stop at the first failure
    pub fail_fast: bool,
    /// Scenario name filter
    pub filter: Option<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserConfig::default(),
            command_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            output_dir: None,
            format: ReportFormat::Text,
            fail_fast: false,
            filter: None,
        }
    }
}

impl SuiteConfig {
    /// Read and validate a YAML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Parse and validate YAML text
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails
    pub fn from_yaml(text: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as YAML
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns a config error naming the first bad field
    pub fn validate(&self) -> ProbeResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(config_error(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.command_timeout_ms == 0 {
            return Err(config_error("command_timeout_ms must be positive"));
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.command_timeout_ms {
            return Err(config_error(
                "poll_interval_ms must be positive and at most command_timeout_ms",
            ));
        }
        if self.browser.viewport_width == 0 || self.browser.viewport_height == 0 {
            return Err(config_error("viewport dimensions must be positive"));
        }
        Ok(())
    }

    /// Retry settings for the session
    #[must_use]
    pub const fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(Duration::from_millis(self.command_timeout_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }

    /// A runner over the full scenario set with filter, fail-fast and output
    /// applied
    #[must_use]
    pub fn runner(&self) -> SuiteRunner {
        let mut runner = SuiteRunner::default().with_fail_fast(self.fail_fast);
        if let Some(filter) = &self.filter {
            runner = runner.with_filter(filter.clone());
        }
        if let Some(dir) = &self.output_dir {
            runner = runner.with_output_dir(dir.clone());
        }
        runner
    }
}

fn config_error(message: impl Into<String>) -> ProbeError {
    ProbeError::ConfigError {
        message: message.into(),
    }
}
