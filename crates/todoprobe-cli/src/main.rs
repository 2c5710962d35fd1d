//! todoprobe CLI: run the TodoMVC scenario set
//!
//! ## Usage
//!
//! ```bash
//! todoprobe run --base-url http://localhost:8080   # Run against a browser
//! todoprobe run --simulated --format junit -o out  # No browser, JUnit report
//! todoprobe list                                   # List scenarios
//! todoprobe mutants                                # Check defect coverage
//! ```

use clap::Parser;
use std::process::ExitCode;
use todoprobe_cli::{
    list_scenarios, logging::init_tracing, Cli, CliConfig, CliResult, CommandRunner, Commands,
};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    let mut config = CliConfig::from_cli(&cli)?;
    init_tracing(config.verbosity, config.color.should_color());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Run(args) => {
            config.apply_run_args(&args)?;
            let mut runner = CommandRunner::new(config);
            runtime.block_on(runner.run(args.simulated))
        }
        Commands::List => {
            print!("{}", list_scenarios());
            Ok(true)
        }
        Commands::Mutants(args) => {
            let mut runner = CommandRunner::new(config);
            runtime.block_on(runner.mutants(args.timeout))
        }
        Commands::Config(args) => {
            config.apply_run_args(&args)?;
            print!("{}", CommandRunner::new(config).config_yaml()?);
            Ok(true)
        }
    }
}
