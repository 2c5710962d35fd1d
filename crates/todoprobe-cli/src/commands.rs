//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use todoprobe::ReportFormat;

/// todoprobe: end-to-end behavioral tests for TodoMVC applications
#[derive(Parser, Debug)]
#[command(name = "todoprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// YAML configuration file
    #[arg(long, global = true, env = "TODOPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scenario set against a TodoMVC app
    Run(RunArgs),

    /// List scenarios in run order
    List,

    /// Check that every injected app defect is caught by some scenario
    Mutants(MutantsArgs),

    /// Print the effective configuration as YAML
    Config(RunArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Application root URL
    #[arg(long, env = "TODOPROBE_BASE_URL")]
    pub base_url: Option<String>,

    /// Only run scenarios whose "group / scenario" name contains PATTERN
    #[arg(short, long, value_name = "PATTERN")]
    pub filter: Option<String>,

    /// Stop at the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Command timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Report format
    #[arg(long)]
    pub format: Option<FormatArg>,

    /// Directory for the report file and failure screenshots
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Path to the chromium binary
    #[arg(long, value_name = "PATH", env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Run against the built-in simulated app instead of a browser
    #[arg(long)]
    pub simulated: bool,
}

/// Arguments for the mutants command
#[derive(Parser, Debug, Default, Clone)]
pub struct MutantsArgs {
    /// Command timeout in milliseconds for each mutant run
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,
}

/// Report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON document
    Json,
    /// JUnit XML
    Junit,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
            FormatArg::Junit => Self::Junit,
        }
    }
}

/// Color output choice
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_verify_cli() {
            use clap::CommandFactory;
            Cli::command().debug_assert();
        }

        #[test]
        fn test_run_flags() {
            let cli = Cli::try_parse_from([
                "todoprobe",
                "-vv",
                "run",
                "--base-url",
                "http://127.0.0.1:3000",
                "--filter",
                "editing",
                "--fail-fast",
                "--timeout",
                "2000",
                "--format",
                "junit",
                "--no-sandbox",
            ])
            .unwrap();
            assert_eq!(cli.verbose, 2);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.base_url.as_deref(), Some("http://127.0.0.1:3000"));
            assert_eq!(args.filter.as_deref(), Some("editing"));
            assert!(args.fail_fast);
            assert_eq!(args.timeout, Some(2000));
            assert_eq!(args.format, Some(FormatArg::Junit));
            assert!(args.no_sandbox);
            assert!(!args.simulated);
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::try_parse_from(["todoprobe", "list", "--color", "never", "-q"]).unwrap();
            assert!(cli.quiet);
            assert_eq!(cli.color, ColorArg::Never);
            assert!(matches!(cli.command, Commands::List));
        }

        #[test]
        fn test_quiet_conflicts_with_verbose() {
            assert!(Cli::try_parse_from(["todoprobe", "-q", "-v", "list"]).is_err());
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["todoprobe"]).is_err());
        }

        #[test]
        fn test_mutants_timeout() {
            let cli = Cli::try_parse_from(["todoprobe", "mutants", "--timeout", "250"]).unwrap();
            let Commands::Mutants(args) = cli.command else {
                panic!("expected mutants");
            };
            assert_eq!(args.timeout, Some(250));
        }
    }

    #[test]
    fn test_format_conversion() {
        assert_eq!(ReportFormat::from(FormatArg::Json), ReportFormat::Json);
        assert_eq!(ReportFormat::from(FormatArg::default()), ReportFormat::Text);
    }
}
