//! Locator abstraction for controls identified by role and accessible name.
//!
//! Locators are strict and auto-wait: an assertion re-queries the page until
//! it holds or the wait window closes, and a locator that resolves to more
//! than one visible element is an error rather than a guess. Hidden matches
//! never count towards strictness.

use std::time::Duration;

use crate::accessibility::{AriaRole, ElementState};
use crate::driver::PageDriver;
use crate::result::{E2eError, E2eResult};
use crate::wait::{wait_for, Probe, WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};

/// Locator options for customizing behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Timeout for auto-waiting
    pub timeout: Duration,
    /// Polling interval for auto-waiting
    pub poll_interval: Duration,
    /// Whether to require strict single-element match
    pub strict: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            strict: true,
        }
    }
}

impl LocatorOptions {
    fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(self.timeout.as_millis() as u64)
            .with_poll_interval(self.poll_interval.as_millis() as u64)
    }
}

/// A locator for an element with an ARIA role and exact accessible name
///
/// `Locator::by_role(AriaRole::Button).with_name("Locate Me")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    role: AriaRole,
    name: String,
    options: LocatorOptions,
}

impl Locator {
    /// Locate elements by role; chain [`Locator::with_name`] to pin the name
    #[must_use]
    pub fn by_role(role: AriaRole) -> Self {
        Self {
            role,
            name: String::new(),
            options: LocatorOptions::default(),
        }
    }

    /// Shorthand for `by_role(AriaRole::Button).with_name(name)`
    #[must_use]
    pub fn button(name: impl Into<String>) -> Self {
        Self::by_role(AriaRole::Button).with_name(name)
    }

    /// Filter by exact accessible name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    /// Disable strict mode (allow multiple matches)
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Role being located
    #[must_use]
    pub const fn role(&self) -> AriaRole {
        self.role
    }

    /// Accessible name being located
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Query the page once, without waiting
    ///
    /// # Errors
    ///
    /// Returns the driver's query error
    pub async fn resolve<D: PageDriver + ?Sized>(&self, driver: &D) -> E2eResult<Vec<ElementState>> {
        driver.query_role(self.role, &self.name).await
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "role={}[name={:?}]", self.role, self.name)
    }
}

/// Smart assertion builder for locators
///
/// `expect(Locator::button("Waze")).to_be_visible().verify(&driver).await?`
#[derive(Debug, Clone)]
pub struct Expect {
    locator: Locator,
}

impl Expect {
    /// Create a new expectation for a locator
    #[must_use]
    pub const fn new(locator: Locator) -> Self {
        Self { locator }
    }

    /// Assert exactly one matching element is visible
    #[must_use]
    pub fn to_be_visible(&self) -> ExpectAssertion {
        ExpectAssertion::IsVisible {
            locator: self.locator.clone(),
        }
    }
}

/// Assertion types for `expect()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectAssertion {
    /// Exactly one visible element matches
    IsVisible {
        /// The locator
        locator: Locator,
    },
}

impl ExpectAssertion {
    /// The locator under assertion
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        match self {
            Self::IsVisible { locator } => locator,
        }
    }

    /// Human-readable expectation
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::IsVisible { locator } => format!("{locator} to be visible"),
        }
    }

    /// Judge one snapshot of matching elements
    ///
    /// Hidden matches are ignored, so a hidden duplicate next to the visible
    /// control is not a strict mode violation.
    #[must_use]
    pub fn evaluate(&self, matches: &[ElementState]) -> Probe<()> {
        let visible = matches.iter().filter(|m| m.visible).count();
        match self {
            Self::IsVisible { locator } => {
                if locator.options.strict && visible > 1 {
                    return Probe::Fatal(E2eError::StrictModeViolation {
                        locator: locator.to_string(),
                        count: visible,
                    });
                }
                if visible > 0 {
                    Probe::Ready(())
                } else if matches.is_empty() {
                    Probe::Pending("element not found".to_string())
                } else {
                    Probe::Pending(format!("{} match(es), none visible", matches.len()))
                }
            }
        }
    }

    /// Poll the page until the assertion holds or the locator's timeout elapses
    ///
    /// Transient query failures (page still loading) are retried.
    ///
    /// # Errors
    ///
    /// [`E2eError::Timeout`] with the last observed state, or
    /// [`E2eError::StrictModeViolation`] when a strict locator is ambiguous.
    pub async fn verify<D: PageDriver + ?Sized>(&self, driver: &D) -> E2eResult<Duration> {
        let locator = self.locator();
        let options = locator.options.wait_options();
        let description = self.describe();
        let assertion = self;

        let result = wait_for(&description, &options, || async move {
            match locator.resolve(driver).await {
                Ok(matches) => assertion.evaluate(&matches),
                Err(E2eError::QueryError { message }) => {
                    Probe::Pending(format!("query failed: {message}"))
                }
                Err(err) => Probe::Fatal(err),
            }
        })
        .await?;

        Ok(result.elapsed)
    }
}

/// Create an expectation for a locator (Playwright-style)
#[must_use]
pub fn expect(locator: Locator) -> Expect {
    Expect::new(locator)
}
