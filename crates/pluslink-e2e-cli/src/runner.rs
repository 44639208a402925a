//! Suite runner glue: configuration layering, browser launch and reports

use crate::commands::{HarnessArgs, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ProgressReporter};
use pluslink_e2e::{
    ChromiumFactory, DriverFactory, HarnessConfig, Reporter, SuiteResults, SuiteRunner, TestSuite,
};
use std::path::Path;
use std::time::Duration;

/// Build the effective harness configuration
///
/// Layers, lowest first: built-in defaults, the `--config` file, then flags
/// (clap fills `--base-url` from the environment when the flag is absent).
///
/// # Errors
///
/// Returns error if the config file cannot be loaded or the result is invalid
pub fn resolve_harness(args: &HarnessArgs) -> CliResult<HarnessConfig> {
    let base = match args.config {
        Some(ref path) => HarnessConfig::from_file(path)
            .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?,
        None => HarnessConfig::default(),
    };
    let config = args.apply(base);
    config.validate()?;
    Ok(config)
}

/// Load a suite file, or the built-in Plus Code suite
///
/// # Errors
///
/// Returns error if the file cannot be read or fails validation
pub fn load_suite(path: Option<&Path>) -> CliResult<TestSuite> {
    match path {
        Some(path) => TestSuite::from_file(path)
            .map_err(|e| CliError::suite(format!("{}: {e}", path.display()))),
        None => Ok(TestSuite::plus_code_links()),
    }
}

/// Runs a suite for the `run` command
#[derive(Debug)]
pub struct TestRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl TestRunner {
    /// Create a new test runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Launch Chromium and run the suite
    ///
    /// # Errors
    ///
    /// Returns error if configuration, suite loading, browser launch or
    /// report writing fails. Failing cases are not errors; inspect
    /// [`SuiteResults::all_passed`].
    pub async fn run(&mut self, args: &RunArgs) -> CliResult<SuiteResults> {
        let harness = resolve_harness(&args.harness)?;
        let suite = load_suite(args.suite.as_deref())?;

        if self.config.verbosity.is_verbose() {
            self.reporter.info("Launching Chromium...");
        }
        let factory = ChromiumFactory::launch(
            &harness.browser,
            Duration::from_millis(harness.navigation_timeout_ms),
        )
        .await?;

        self.execute(factory, harness, &suite, args).await
    }

    /// Run `suite` with drivers from `factory`, print results and write reports
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or a report cannot be written
    pub async fn execute<F: DriverFactory>(
        &mut self,
        factory: F,
        harness: HarnessConfig,
        suite: &TestSuite,
        args: &RunArgs,
    ) -> CliResult<SuiteResults> {
        let filter = args.filter.as_deref();
        let total = suite.filtered(filter).len() * harness.repeat.max(1) as usize;
        let runner = SuiteRunner::new(factory, harness)?;

        if total == 0 {
            self.reporter.warning("No cases match the filter");
        }
        self.reporter.header(&format!(
            "{} against {}",
            suite.name,
            runner.config().base_url
        ));
        self.reporter.start_progress(total as u64, &suite.name);

        let reporter = &self.reporter;
        let results = runner
            .run_with(suite, filter, |result| reporter.case_finished(result))
            .await;
        reporter.finish();

        if let Err(e) = runner.shutdown().await {
            self.reporter.warning(&format!("Browser shutdown failed: {e}"));
        }

        for result in &results.results {
            self.reporter.case_line(result);
        }
        self.reporter.summary(
            results.passed_count(),
            results.failed_count(),
            results.skipped_count(),
            results.duration,
        );

        self.write_reports(&results, args)?;
        Ok(results)
    }

    fn write_reports(&self, results: &SuiteResults, args: &RunArgs) -> CliResult<()> {
        let report = Reporter::from_results(results);

        if let Some(ref path) = args.junit {
            report
                .generate_junit(path)
                .map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
            if self.config.verbosity.is_verbose() {
                self.reporter
                    .info(&format!("JUnit report written to {}", path.display()));
            }
        }

        if let Some(ref path) = args.json {
            report
                .generate_json(path)
                .map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
            if self.config.verbosity.is_verbose() {
                self.reporter
                    .info(&format!("JSON report written to {}", path.display()));
            }
        }

        if OutputFormat::from(args.format) == OutputFormat::Json {
            println!("{}", report.render_json()?);
        }

        Ok(())
    }
}
