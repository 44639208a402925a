//! Driver abstraction for page automation.
//!
//! A [`DriverFactory`] hands out one isolated [`PageDriver`] per test case.
//! The Chromium implementation lives in [`crate::browser`]; [`MockFactory`]
//! drives scripted in-memory pages for unit tests and dry runs.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  SuiteRunner                                              │
//! │     │ open() per case                                     │
//! │     ▼                                                     │
//! │  DriverFactory ──► PageDriver (navigate / query / close)  │
//! │     ├─ ChromiumFactory  (one browser, one context/case)   │
//! │     └─ MockFactory      (scripted pages, no browser)      │
//! └──────────────────────────────────────────────────────────┘
//! ```

use crate::accessibility::{AccessibleElement, AriaRole, ElementState};
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

/// One isolated page the suite can drive
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to an absolute URL
    async fn navigate(&mut self, url: &str) -> E2eResult<()>;

    /// Every element with `role` whose accessible name is exactly `name`
    async fn query_role(&self, role: AriaRole, name: &str) -> E2eResult<Vec<ElementState>>;

    /// Release the page and its browser context
    async fn close(&mut self) -> E2eResult<()>;
}

/// Opens fresh drivers, one per test case
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Driver type produced by this factory
    type Driver: PageDriver;

    /// Open a new isolated driver
    async fn open(&self) -> E2eResult<Self::Driver>;

    /// Release shared resources once the run is over
    async fn shutdown(&self) -> E2eResult<()> {
        Ok(())
    }
}

/// Element on a scripted page, optionally rendered late
#[derive(Debug, Clone)]
pub struct ScriptedElement {
    /// The element
    pub element: AccessibleElement,
    /// Number of queries after navigation before the element is rendered
    pub appears_after_polls: u32,
}

/// A scripted site keyed by URL fragment
///
/// Pages are looked up by the text after `#` (empty string for no fragment).
/// Fragments without a page render nothing.
#[derive(Debug, Clone, Default)]
pub struct MockSite {
    pages: HashMap<String, Vec<ScriptedElement>>,
    unreachable: bool,
}

impl MockSite {
    /// Create an empty site
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page rendered immediately for `fragment`
    #[must_use]
    pub fn page(mut self, fragment: impl Into<String>, elements: Vec<AccessibleElement>) -> Self {
        let scripted = elements
            .into_iter()
            .map(|element| ScriptedElement {
                element,
                appears_after_polls: 0,
            })
            .collect();
        self.pages.insert(fragment.into(), scripted);
        self
    }

    /// Add an element that renders only after `polls` queries
    #[must_use]
    pub fn late_element(
        mut self,
        fragment: impl Into<String>,
        element: AccessibleElement,
        polls: u32,
    ) -> Self {
        self.pages
            .entry(fragment.into())
            .or_default()
            .push(ScriptedElement {
                element,
                appears_after_polls: polls,
            });
        self
    }

    /// Make every navigation fail as if the server were down
    #[must_use]
    pub const fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    fn elements_for(&self, url: &str) -> &[ScriptedElement] {
        let fragment = url.split_once('#').map_or("", |(_, fragment)| fragment);
        self.pages
            .get(fragment)
            .map_or(&[] as &[ScriptedElement], Vec::as_slice)
    }
}

/// Driver over a [`MockSite`]
#[derive(Debug)]
pub struct MockDriver {
    site: Arc<MockSite>,
    current_url: String,
    polls: AtomicU32,
    closed: Arc<AtomicUsize>,
    is_closed: bool,
}

impl MockDriver {
    /// Create a driver for a site
    #[must_use]
    pub fn new(site: Arc<MockSite>) -> Self {
        Self {
            site,
            current_url: String::from("about:blank"),
            polls: AtomicU32::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
            is_closed: false,
        }
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> E2eResult<()> {
        if self.site.unreachable {
            return Err(E2eError::NavigationError {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_REFUSED".to_string(),
            });
        }
        self.current_url = url.to_string();
        self.polls.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn query_role(&self, role: AriaRole, name: &str) -> E2eResult<Vec<ElementState>> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .site
            .elements_for(&self.current_url)
            .iter()
            .filter(|s| s.appears_after_polls <= poll)
            .filter(|s| s.element.computed_role() == Some(role))
            .map(|s| s.element.state())
            .filter(|state| state.name == name)
            .collect())
    }

    async fn close(&mut self) -> E2eResult<()> {
        if !self.is_closed {
            self.is_closed = true;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Factory handing out [`MockDriver`]s that share one [`MockSite`]
#[derive(Debug, Clone)]
pub struct MockFactory {
    site: Arc<MockSite>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    fail_open: bool,
}

impl MockFactory {
    /// Create a factory for `site`
    #[must_use]
    pub fn new(site: MockSite) -> Self {
        Self {
            site: Arc::new(site),
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
            fail_open: false,
        }
    }

    /// Make every `open()` fail, as when the browser cannot create a context
    #[must_use]
    pub const fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Drivers opened so far
    #[must_use]
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Drivers closed so far
    #[must_use]
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DriverFactory for MockFactory {
    type Driver = MockDriver;

    async fn open(&self) -> E2eResult<MockDriver> {
        if self.fail_open {
            return Err(E2eError::PageError {
                message: "could not create browser context".to_string(),
            });
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        let mut driver = MockDriver::new(Arc::clone(&self.site));
        driver.closed = Arc::clone(&self.closed);
        Ok(driver)
    }
}
