//! todoprobe CLI library
//!
//! Argument parsing, configuration layering, progress output and the
//! command implementations behind the `todoprobe` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, FormatArg, MutantsArgs, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
pub use runner::{list_scenarios, report_file_name, CommandRunner};
