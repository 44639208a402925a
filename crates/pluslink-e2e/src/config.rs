//! Harness configuration.
//!
//! Layered as defaults, then an optional YAML file, then command-line flags
//! (which clap also fills from the environment).

use crate::browser::BrowserConfig;
use crate::result::{E2eError, E2eResult};
use crate::runner::FailureMode;
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default address of the application under test (SvelteKit preview server)
pub const DEFAULT_BASE_URL: &str = "http://localhost:4173";

/// Default navigation timeout (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Environment variable holding the base URL
pub const BASE_URL_ENV: &str = "PLUSLINK_BASE_URL";

/// Everything a suite run needs besides the suite itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Base URL targets are resolved against
    pub base_url: String,
    /// Visibility wait window per case
    pub timeout_ms: u64,
    /// Interval between visibility probes
    pub poll_interval_ms: u64,
    /// Upper bound for a single navigation
    pub navigation_timeout_ms: u64,
    /// Cases run concurrently (0 = available parallelism)
    pub jobs: usize,
    /// Stop scheduling cases after the first failure
    pub fail_fast: bool,
    /// Times each case is run, each in a fresh context
    pub repeat: u32,
    /// Browser launch options
    pub browser: BrowserConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            jobs: 0,
            fail_fast: false,
            repeat: 1,
            browser: BrowserConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the visibility timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the navigation timeout
    #[must_use]
    pub const fn with_navigation_timeout(mut self, timeout_ms: u64) -> Self {
        self.navigation_timeout_ms = timeout_ms;
        self
    }

    /// Set parallel jobs
    #[must_use]
    pub const fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Set fail fast
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set repeat count
    #[must_use]
    pub const fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set browser options
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Wait options for visibility assertions
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Failure mode implied by `fail_fast`
    #[must_use]
    pub const fn failure_mode(&self) -> FailureMode {
        if self.fail_fast {
            FailureMode::FailFast
        } else {
            FailureMode::CollectAll
        }
    }

    /// Get effective number of parallel jobs
    #[must_use]
    pub fn effective_jobs(&self) -> usize {
        if self.jobs == 0 {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1)
        } else {
            self.jobs
        }
    }

    /// Parse from YAML and validate
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed or values are out of range
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is invalid
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Render as YAML
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> E2eResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::InvalidConfig`] naming the offending field
    pub fn validate(&self) -> E2eResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::invalid_config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.base_url.contains('#') {
            return Err(E2eError::invalid_config("base_url must not contain a fragment"));
        }
        if self.timeout_ms == 0 {
            return Err(E2eError::invalid_config("timeout_ms must be greater than 0"));
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.timeout_ms {
            return Err(E2eError::invalid_config(
                "poll_interval_ms must be between 1 and timeout_ms",
            ));
        }
        if self.navigation_timeout_ms == 0 {
            return Err(E2eError::invalid_config(
                "navigation_timeout_ms must be greater than 0",
            ));
        }
        if self.repeat == 0 {
            return Err(E2eError::invalid_config("repeat must be at least 1"));
        }
        Ok(())
    }
}
