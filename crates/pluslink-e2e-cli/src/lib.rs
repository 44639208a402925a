//! pluslink-e2e CLI library
//!
//! Command-line front end for the Plus Code link page acceptance suite.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, FormatArg, HarnessArgs, ListArgs, RunArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_case_table, OutputFormat, ProgressReporter};
pub use runner::{load_suite, resolve_harness, TestRunner};
