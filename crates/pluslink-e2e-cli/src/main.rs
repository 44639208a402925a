//! pluslink-e2e: run the Plus Code link page acceptance suite
//!
//! ## Usage
//!
//! ```bash
//! pluslink-e2e run --base-url http://localhost:4173   # Built-in suite
//! pluslink-e2e run --suite suite.yaml --junit junit.xml
//! pluslink-e2e list                                   # Show cases
//! pluslink-e2e config --config harness.yaml           # Effective config
//! ```

use clap::Parser;
use pluslink_e2e_cli::{
    load_suite, render_case_table, resolve_harness, Cli, CliConfig, CliResult, Commands,
    TestRunner, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(&config);

    match run(cli.command, config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.default_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .try_init();
}

/// Returns whether every case passed
fn run(command: Commands, config: CliConfig) -> CliResult<bool> {
    match command {
        Commands::Run(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            let mut runner = TestRunner::new(config);
            let results = rt.block_on(runner.run(&args))?;
            Ok(results.all_passed())
        }
        Commands::List(args) => {
            let suite = load_suite(args.suite.as_deref())?;
            print!(
                "{}",
                render_case_table(&suite.name, &suite.filtered(args.filter.as_deref()))
            );
            Ok(true)
        }
        Commands::Config(args) => {
            let harness = resolve_harness(&args.harness)?;
            print!("{}", harness.to_yaml()?);
            Ok(true)
        }
    }
}
