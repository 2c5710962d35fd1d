//! CLI configuration
//!
//! Effective settings are layered: built-in defaults, then the YAML config
//! file, then command-line flags.

use crate::commands::{Cli, RunArgs};
use crate::error::CliResult;
use serde::{Deserialize, Serialize};
use todoprobe::SuiteConfig;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// From `-q` and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default `tracing` filter directive
    #[must_use]
    pub const fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "todoprobe=info,warn",
            Self::Debug => "todoprobe=debug,info",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Suite settings after merging file and flags
    pub suite: SuiteConfig,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set suite configuration
    #[must_use]
    pub fn with_suite(mut self, suite: SuiteConfig) -> Self {
        self.suite = suite;
        self
    }

    /// Global flags plus the config file, if any
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let suite = match &cli.config {
            Some(path) => SuiteConfig::load(path)?,
            None => SuiteConfig::default(),
        };
        Ok(Self::new()
            .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
            .with_color(cli.color.into())
            .with_suite(suite))
    }

    /// Layer run flags over the suite settings and re-validate
    pub fn apply_run_args(&mut self, args: &RunArgs) -> CliResult<()> {
        let suite = &mut self.suite;
        if let Some(url) = &args.base_url {
            suite.base_url.clone_from(url);
        }
        if let Some(filter) = &args.filter {
            suite.filter = Some(filter.clone());
        }
        if args.fail_fast {
            suite.fail_fast = true;
        }
        if let Some(ms) = args.timeout {
            suite.command_timeout_ms = ms;
            suite.poll_interval_ms = suite.poll_interval_ms.min(ms);
        }
        if let Some(format) = args.format {
            suite.format = format.into();
        }
        if let Some(dir) = &args.output {
            suite.output_dir = Some(dir.clone());
        }
        if args.headed {
            suite.browser.headless = false;
        }
        if let Some(path) = &args.chromium_path {
            suite.browser.chromium_path = Some(path.clone());
        }
        if args.no_sandbox {
            suite.browser.sandbox = false;
        }
        suite.validate()?;
        Ok(())
    }
}
