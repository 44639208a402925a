//! pluslink-e2e: browser acceptance tests for the Plus Code link page.
//!
//! The page under test turns a Plus Code in the URL fragment into map
//! provider buttons (Waze, Apple Maps, Google Maps) and falls back to a
//! "Locate Me" button otherwise. This crate navigates a headless Chromium to
//! the page and asserts, by ARIA role and exact accessible name, that the
//! expected buttons become visible.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────────┐    │
//! │   │ TestSuite  │    │ SuiteRunner│    │ DriverFactory      │    │
//! │   │ (YAML or   │───►│ (bounded   │───►│  ChromiumFactory   │    │
//! │   │  built-in) │    │  parallel) │    │  MockFactory       │    │
//! │   └────────────┘    └─────┬──────┘    └────────────────────┘    │
//! │                           ▼                                     │
//! │                     ┌────────────┐                              │
//! │                     │ Reporter   │  summary / JUnit / JSON      │
//! │                     └────────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pluslink_e2e::prelude::*;
//!
//! # tokio_test_runtime();
//! # fn tokio_test_runtime() {
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
//! # rt.block_on(async {
//! let site = MockSite::new()
//!     .page("", vec![AccessibleElement::button("Locate Me")])
//!     .page("12345678+90", vec![AccessibleElement::button("Locate Me")])
//!     .page(
//!         "86x4rv66+99",
//!         vec![
//!             AccessibleElement::button("Waze"),
//!             AccessibleElement::button("Apple Maps"),
//!             AccessibleElement::button("Google Maps"),
//!         ],
//!     );
//!
//! let config = HarnessConfig::new().with_base_url("http://localhost:4173");
//! let runner = SuiteRunner::new(MockFactory::new(site), config).unwrap();
//! let results = runner.run(&TestSuite::plus_code_links(), None).await;
//! assert!(results.all_passed());
//! # });
//! # }
//! ```

#![warn(missing_docs)]

mod accessibility;
mod browser;
mod config;
mod driver;
mod locator;
mod reporter;
mod result;
mod runner;
mod scenario;
mod wait;

pub use accessibility::{
    normalize_name, role_query_script, AccessibleElement, AriaRole, ElementState,
};
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use browser::{BrowserConfig, ChromiumFactory};
pub use config::{
    HarnessConfig, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_NAVIGATION_TIMEOUT_MS,
};
pub use driver::{DriverFactory, MockDriver, MockFactory, MockSite, PageDriver, ScriptedElement};
pub use locator::{expect, Expect, ExpectAssertion, Locator, LocatorOptions};
pub use reporter::Reporter;
pub use result::{E2eError, E2eResult, FailureKind};
pub use runner::{CaseResult, CaseStatus, FailureMode, SuiteResults, SuiteRunner};
pub use scenario::{
    ExpectedControl, NavigationTarget, TestCase, TestSuite, INVALID_PLUS_CODE, SUITE_VERSION,
    VALID_PLUS_CODE,
};
pub use wait::{
    wait_for, Probe, WaitOptions, WaitResult, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::accessibility::*;
    pub use super::browser::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::locator::*;
    pub use super::reporter::*;
    pub use super::result::*;
    pub use super::runner::*;
    pub use super::scenario::*;
    pub use super::wait::*;
}
