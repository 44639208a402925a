//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use pluslink_e2e::{BrowserConfig, HarnessConfig, BASE_URL_ENV};
use std::path::PathBuf;

/// Browser acceptance tests for the Plus Code link page
#[derive(Parser, Debug)]
#[command(name = "pluslink-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the acceptance suite against a live page
    Run(RunArgs),

    /// List the cases of a suite
    List(ListArgs),

    /// Print the effective harness configuration as YAML
    Config(ConfigArgs),
}

/// Harness options shared by `run` and `config`
///
/// Every flag is optional so that unset flags leave the config file (or the
/// built-in defaults) untouched.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct HarnessArgs {
    /// Base URL of the page under test
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    /// Harness configuration file (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of cases run concurrently (0 = auto)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Visibility timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Interval between visibility checks in milliseconds
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Navigation timeout in milliseconds
    #[arg(long)]
    pub navigation_timeout: Option<u64>,

    /// Skip remaining cases after the first failure
    #[arg(long, overrides_with = "no_fail_fast")]
    pub fail_fast: bool,

    /// Run every case even if one fails (overrides `fail_fast` from --config)
    #[arg(long, overrides_with = "fail_fast")]
    pub no_fail_fast: bool,

    /// Run each case this many times, each in a fresh browser context
    #[arg(long)]
    pub repeat: Option<u32>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Path to the Chromium executable
    #[arg(long)]
    pub chromium_path: Option<String>,

    /// Disable the Chromium sandbox (containers, CI)
    #[arg(long)]
    pub no_sandbox: bool,
}

impl HarnessArgs {
    /// Apply the flags that were given on top of `config`
    #[must_use]
    pub fn apply(&self, mut config: HarnessConfig) -> HarnessConfig {
        if let Some(ref base_url) = self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = timeout;
        }
        if let Some(interval) = self.poll_interval {
            config.poll_interval_ms = interval;
        }
        if let Some(timeout) = self.navigation_timeout {
            config.navigation_timeout_ms = timeout;
        }
        if self.fail_fast {
            config.fail_fast = true;
        } else if self.no_fail_fast {
            config.fail_fast = false;
        }
        if let Some(repeat) = self.repeat {
            config.repeat = repeat;
        }
        config.browser = self.apply_browser(config.browser);
        config
    }

    fn apply_browser(&self, mut browser: BrowserConfig) -> BrowserConfig {
        if self.headed {
            browser = browser.with_headless(false);
        }
        if let Some(ref path) = self.chromium_path {
            browser = browser.with_chromium_path(path.clone());
        }
        if self.no_sandbox {
            browser = browser.with_no_sandbox();
        }
        browser
    }
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Harness options
    #[command(flatten)]
    pub harness: HarnessArgs,

    /// Suite file (YAML); the built-in Plus Code suite when absent
    #[arg(long)]
    pub suite: Option<PathBuf>,

    /// Only run cases whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Write a JUnit XML report
    #[arg(long)]
    pub junit: Option<PathBuf>,

    /// Write a JSON report
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Output format on stdout
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Suite file (YAML); the built-in Plus Code suite when absent
    #[arg(long)]
    pub suite: Option<PathBuf>,

    /// Only list cases whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Harness options
    #[command(flatten)]
    pub harness: HarnessArgs,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
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
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pluslink-e2e").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_run_defaults() {
            let cli = parse(&["run"]);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert!(args.suite.is_none());
            assert_eq!(args.format, FormatArg::Text);
            assert!(!args.harness.fail_fast);
            assert_eq!(cli.verbose, 0);
        }

        #[test]
        fn test_run_flags() {
            let cli = parse(&[
                "-vv",
                "run",
                "--base-url",
                "http://127.0.0.1:5173/",
                "-j",
                "4",
                "--timeout",
                "2000",
                "--fail-fast",
                "--repeat",
                "3",
                "-f",
                "Waze",
                "--junit",
                "out/junit.xml",
                "--format",
                "json",
            ]);
            assert_eq!(cli.verbose, 2);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.harness.jobs, Some(4));
            assert_eq!(args.harness.repeat, Some(3));
            assert_eq!(args.filter.as_deref(), Some("Waze"));
            assert_eq!(args.format, FormatArg::Json);
            assert_eq!(args.junit, Some(PathBuf::from("out/junit.xml")));
        }

        #[test]
        fn test_list_and_config() {
            assert!(matches!(parse(&["list"]).command, Commands::List(_)));
            assert!(matches!(
                parse(&["config", "--headed"]).command,
                Commands::Config(_)
            ));
        }

        #[test]
        fn test_last_fail_fast_flag_wins() {
            let Commands::Run(args) = parse(&["run", "--fail-fast", "--no-fail-fast"]).command
            else {
                panic!("expected run");
            };
            assert!(!args.harness.fail_fast);
            assert!(args.harness.no_fail_fast);
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["pluslink-e2e"]).is_err());
        }
    }

    mod apply_tests {
        use super::*;

        #[test]
        fn test_unset_flags_keep_config() {
            let base = HarnessConfig::new().with_jobs(7).with_timeout(9_000);
            let applied = HarnessArgs::default().apply(base.clone());
            assert_eq!(applied, base);
        }

        #[test]
        fn test_no_fail_fast_overrides_config() {
            let args = HarnessArgs {
                no_fail_fast: true,
                ..HarnessArgs::default()
            };
            let config = args.apply(HarnessConfig::new().with_fail_fast(true));
            assert!(!config.fail_fast);
        }

        #[test]
        fn test_flags_override_config() {
            let args = HarnessArgs {
                base_url: Some("https://plus.example/".to_string()),
                jobs: Some(2),
                timeout: Some(1_500),
                poll_interval: Some(25),
                navigation_timeout: Some(10_000),
                fail_fast: true,
                repeat: Some(2),
                headed: true,
                chromium_path: Some("/usr/bin/chromium".to_string()),
                no_sandbox: true,
                ..HarnessArgs::default()
            };
            let config = args.apply(HarnessConfig::new());
            assert_eq!(config.base_url, "https://plus.example/");
            assert_eq!(config.jobs, 2);
            assert_eq!(config.timeout_ms, 1_500);
            assert_eq!(config.poll_interval_ms, 25);
            assert_eq!(config.navigation_timeout_ms, 10_000);
            assert!(config.fail_fast);
            assert_eq!(config.repeat, 2);
            assert!(!config.browser.headless);
            assert!(!config.browser.sandbox);
            assert_eq!(
                config.browser.chromium_path.as_deref(),
                Some("/usr/bin/chromium")
            );
        }
    }
}
