//! Result and error types for pluslink-e2e.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for suite operations
pub type E2eResult<T> = Result<T, E2eError>;

/// How a failed case is classified in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The page rendered but the expected control did not satisfy the assertion
    Assertion,
    /// The wait window elapsed before the control became visible
    Timeout,
    /// The navigation target could not be loaded
    Navigation,
    /// Browser, context or configuration problem outside the page under test
    Infrastructure,
}

impl FailureKind {
    /// Short label used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assertion => "assertion",
            Self::Timeout => "timeout",
            Self::Navigation => "navigation",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while running the suite
#[derive(Debug, Error)]
pub enum E2eError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set --chromium-path")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Browser context or page could not be opened
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Script evaluation inside the page failed
    #[error("Page query failed: {message}")]
    QueryError {
        /// Error message
        message: String,
    },

    /// Wait window elapsed
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Condition description, including the last observed state
        waited_for: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// More than one element matched a strict locator
    #[error("Strict mode violation: {locator} resolved to {count} elements")]
    StrictModeViolation {
        /// Locator description
        locator: String,
        /// Number of matches
        count: usize,
    },

    /// Navigation target is not a valid relative URL
    #[error("Invalid navigation target '{target}': {message}")]
    InvalidTarget {
        /// Offending target
        target: String,
        /// Error message
        message: String,
    },

    /// Suite definition is invalid
    #[error("Invalid suite: {message}")]
    InvalidSuite {
        /// Error message
        message: String,
    },

    /// Harness configuration is invalid
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// Feature not compiled in
    #[error("{feature} support not enabled. Rebuild with --features {feature}")]
    FeatureDisabled {
        /// Cargo feature name
        feature: &'static str,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl E2eError {
    /// Classify the error for reporting
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::AssertionFailed { .. } | Self::StrictModeViolation { .. } => {
                FailureKind::Assertion
            }
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::NavigationError { .. } | Self::InvalidTarget { .. } => FailureKind::Navigation,
            Self::BrowserNotFound
            | Self::BrowserLaunchError { .. }
            | Self::PageError { .. }
            | Self::QueryError { .. }
            | Self::InvalidSuite { .. }
            | Self::InvalidConfig { .. }
            | Self::FeatureDisabled { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_) => FailureKind::Infrastructure,
        }
    }

    /// Create an invalid-suite error
    #[must_use]
    pub fn invalid_suite(message: impl Into<String>) -> Self {
        Self::InvalidSuite {
            message: message.into(),
        }
    }

    /// Create an invalid-config error
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
