//! Suite execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  SuiteRunner::run                                          │
//! │                                                            │
//! │   case 1 ─┐                                                │
//! │   case 2 ─┼─► up to `jobs` at once, each in its own driver │
//! │   case 3 ─┘   open → navigate → expect visible → close     │
//! │                                                            │
//! │   results come back in suite order                         │
//! └────────────────────────────────────────────────────────────┘
//! ```

use crate::config::HarnessConfig;
use crate::driver::{DriverFactory, PageDriver};
use crate::locator::expect;
use crate::result::{E2eError, E2eResult, FailureKind};
use crate::scenario::{TestCase, TestSuite};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// What happens after a case fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailureMode {
    /// Every case runs; failures are collected
    #[default]
    CollectAll,
    /// Cases not yet started are skipped once a failure is seen
    FailFast,
}

/// Final state of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Expected control was visible
    Passed,
    /// Assertion, timeout, navigation or infrastructure failure
    Failed,
    /// Not run because fail-fast stopped the suite
    Skipped,
}

/// Result of running one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name (suffixed `#n` for repeats)
    pub name: String,
    /// Navigation target as authored
    pub target: String,
    /// Expected control, e.g. `button "Waze"`
    pub expected: String,
    /// Final status
    pub status: CaseStatus,
    /// Failure classification when failed
    pub failure: Option<FailureKind>,
    /// Failure message when failed
    pub message: Option<String>,
    /// Wall-clock duration
    pub duration: Duration,
}

impl CaseResult {
    fn base(name: String, case: &TestCase, status: CaseStatus, duration: Duration) -> Self {
        Self {
            name,
            target: case.target.to_string(),
            expected: case.expected.to_string(),
            status,
            failure: None,
            message: None,
            duration,
        }
    }

    /// A passing result
    #[must_use]
    pub fn passed(name: impl Into<String>, case: &TestCase, duration: Duration) -> Self {
        Self::base(name.into(), case, CaseStatus::Passed, duration)
    }

    /// A failing result classified from `error`
    #[must_use]
    pub fn failed(
        name: impl Into<String>,
        case: &TestCase,
        error: &E2eError,
        duration: Duration,
    ) -> Self {
        Self {
            failure: Some(error.kind()),
            message: Some(error.to_string()),
            ..Self::base(name.into(), case, CaseStatus::Failed, duration)
        }
    }

    /// A skipped result
    #[must_use]
    pub fn skipped(name: impl Into<String>, case: &TestCase) -> Self {
        Self::base(name.into(), case, CaseStatus::Skipped, Duration::ZERO)
    }

    /// Whether the case passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self.status, CaseStatus::Passed)
    }

    /// Whether the case failed
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, CaseStatus::Failed)
    }
}

/// Results from running a suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual results in suite order
    pub results: Vec<CaseResult>,
    /// Total wall-clock duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Check if no case failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| !r.is_failed())
    }

    /// Get passed count
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_passed()).count()
    }

    /// Get failed count
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }

    /// Get skipped count
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == CaseStatus::Skipped)
            .count()
    }

    /// Get total count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failures
    #[must_use]
    pub fn failures(&self) -> Vec<&CaseResult> {
        self.results.iter().filter(|r| r.is_failed()).collect()
    }
}

/// Runs suites against drivers from a [`DriverFactory`]
#[derive(Debug)]
pub struct SuiteRunner<F> {
    factory: F,
    config: HarnessConfig,
}

impl<F: DriverFactory> SuiteRunner<F> {
    /// Create a runner
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::InvalidConfig`] if `config` fails validation
    pub fn new(factory: F, config: HarnessConfig) -> E2eResult<Self> {
        config.validate()?;
        Ok(Self { factory, config })
    }

    /// The driver factory
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// The harness configuration
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every case of `suite` whose name contains `filter`
    pub async fn run(&self, suite: &TestSuite, filter: Option<&str>) -> SuiteResults {
        self.run_with(suite, filter, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_result` as each result becomes
    /// available (in suite order)
    #[instrument(skip(self, suite, on_result), fields(suite = %suite.name))]
    pub async fn run_with(
        &self,
        suite: &TestSuite,
        filter: Option<&str>,
        mut on_result: impl FnMut(&CaseResult),
    ) -> SuiteResults {
        let start = Instant::now();
        let repeat = self.config.repeat.max(1);
        let jobs = self.config.effective_jobs();
        let mode = self.config.failure_mode();
        let stop = AtomicBool::new(false);

        let scheduled: Vec<(String, &TestCase)> = suite
            .filtered(filter)
            .into_iter()
            .flat_map(|case| {
                (1..=repeat).map(move |i| {
                    let name = if repeat > 1 {
                        format!("{} #{i}", case.name)
                    } else {
                        case.name.clone()
                    };
                    (name, case)
                })
            })
            .collect();

        info!(
            cases = scheduled.len(),
            jobs,
            base_url = %self.config.base_url,
            "running suite"
        );

        let stop = &stop;
        let results: Vec<CaseResult> = stream::iter(scheduled)
            .map(|(name, case)| async move {
                if mode == FailureMode::FailFast && stop.load(Ordering::SeqCst) {
                    return CaseResult::skipped(name, case);
                }
                let result = self.run_case(name, case).await;
                if result.is_failed() && mode == FailureMode::FailFast {
                    stop.store(true, Ordering::SeqCst);
                }
                result
            })
            .buffered(jobs)
            .inspect(|result| on_result(result))
            .collect()
            .await;

        let results = SuiteResults {
            suite_name: suite.name.clone(),
            results,
            duration: start.elapsed(),
        };

        if results.all_passed() {
            info!(
                passed = results.passed_count(),
                elapsed_ms = u64::try_from(results.duration.as_millis()).unwrap_or(u64::MAX),
                "suite passed"
            );
        } else {
            warn!(
                failed = results.failed_count(),
                skipped = results.skipped_count(),
                "suite failed"
            );
        }

        results
    }

    /// Run one case in a fresh driver; the driver is closed whatever happens
    #[instrument(skip(self, case), fields(target = %case.target, expected = %case.expected))]
    pub async fn run_case(&self, name: String, case: &TestCase) -> CaseResult {
        let start = Instant::now();

        let mut driver = match self.factory.open().await {
            Ok(driver) => driver,
            Err(err) => {
                warn!(error = %err, "could not open driver");
                return CaseResult::failed(name, case, &err, start.elapsed());
            }
        };

        let outcome = self.exercise(&mut driver, case).await;

        if let Err(err) = driver.close().await {
            warn!(error = %err, "driver did not close cleanly");
        }

        match outcome {
            Ok(()) => CaseResult::passed(name, case, start.elapsed()),
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, "case failed");
                CaseResult::failed(name, case, &err, start.elapsed())
            }
        }
    }

    async fn exercise(&self, driver: &mut F::Driver, case: &TestCase) -> E2eResult<()> {
        let url = case.target.resolve(&self.config.base_url);
        driver.navigate(&url).await?;

        let wait = self.config.wait_options();
        let locator = case
            .expected
            .locator()
            .with_timeout(wait.timeout())
            .with_poll_interval(wait.poll_interval());
        expect(locator).to_be_visible().verify(&*driver).await?;
        Ok(())
    }

    /// Release factory resources (the browser process)
    ///
    /// # Errors
    ///
    /// Returns the factory's shutdown error
    pub async fn shutdown(&self) -> E2eResult<()> {
        self.factory.shutdown().await
    }
}
