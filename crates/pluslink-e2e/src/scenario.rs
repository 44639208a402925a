//! Test cases, navigation targets and suites.
//!
//! A suite is a flat, order-independent table of `{target, expected control}`
//! pairs. The built-in suite covers the Plus Code page; other suites load from
//! YAML:
//!
//! ```yaml
//! version: "1.0"
//! name: plus-code-links
//! cases:
//!   - name: renders [Locate Me] button
//!     target: "/"
//!     expect: { role: button, name: "Locate Me" }
//! ```

use crate::accessibility::AriaRole;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Supported suite schema version
pub const SUITE_VERSION: &str = "1.0";

/// Fragment the application accepts as a Plus Code
pub const VALID_PLUS_CODE: &str = "86x4rv66+99";

/// Fragment the application rejects
pub const INVALID_PLUS_CODE: &str = "12345678+90";

/// A relative path plus an opaque URL fragment
///
/// The fragment is user input for the page under test and is passed through
/// byte for byte: no percent-encoding, no case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NavigationTarget {
    path: String,
    fragment: Option<String>,
}

impl NavigationTarget {
    /// Target at `path` with no fragment
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::InvalidTarget`] if `path` is not a relative URL path
    pub fn new(path: impl Into<String>) -> E2eResult<Self> {
        let path = path.into();
        Self::validate_path(&path)?;
        Ok(Self {
            path,
            fragment: None,
        })
    }

    /// Attach a fragment (text after `#`)
    #[must_use]
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Parse `"/path#fragment"`; everything after the first `#` is the fragment
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::InvalidTarget`] if the path part is invalid
    pub fn parse(target: &str) -> E2eResult<Self> {
        match target.split_once('#') {
            Some((path, fragment)) => Ok(Self::new(path)?.with_fragment(fragment)),
            None => Self::new(target),
        }
    }

    fn validate_path(path: &str) -> E2eResult<()> {
        let invalid = |message: &str| E2eError::InvalidTarget {
            target: path.to_string(),
            message: message.to_string(),
        };
        if !path.starts_with('/') {
            return Err(invalid("path must start with '/'"));
        }
        if path.starts_with("//") {
            return Err(invalid("protocol-relative URLs are not relative paths"));
        }
        if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("path must not contain whitespace or control characters"));
        }
        Ok(())
    }

    /// Path component
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fragment, if any
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Absolute URL against `base_url`
    #[must_use]
    pub fn resolve(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

impl std::fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)?;
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for NavigationTarget {
    type Error = E2eError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NavigationTarget> for String {
    fn from(target: NavigationTarget) -> Self {
        target.to_string()
    }
}

/// The control a case expects to see
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpectedControl {
    /// ARIA role
    pub role: AriaRole,
    /// Exact accessible name
    pub name: String,
}

impl ExpectedControl {
    /// A button with an exact accessible name
    #[must_use]
    pub fn button(name: impl Into<String>) -> Self {
        Self {
            role: AriaRole::Button,
            name: name.into(),
        }
    }

    /// Locator for this control
    #[must_use]
    pub fn locator(&self) -> Locator {
        Locator::by_role(self.role).with_name(self.name.clone())
    }
}

impl std::fmt::Display for ExpectedControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} \"{}\"", self.role, self.name)
    }
}

/// A single navigate-and-assert case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Test name
    pub name: String,
    /// Where to navigate
    pub target: NavigationTarget,
    /// What must be visible afterwards
    #[serde(rename = "expect")]
    pub expected: ExpectedControl,
}

impl TestCase {
    /// Create a new test case
    #[must_use]
    pub fn new(name: impl Into<String>, target: NavigationTarget, expected: ExpectedControl) -> Self {
        Self {
            name: name.into(),
            target,
            expected,
        }
    }
}

/// A named table of test cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    /// Schema version (must be "1.0")
    pub version: String,
    /// Suite name
    pub name: String,
    /// Cases in authoring order
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    /// Create an empty suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SUITE_VERSION.to_string(),
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Add a test case
    pub fn add_case(&mut self, case: TestCase) {
        self.cases.push(case);
    }

    /// Get the number of cases
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// The Plus Code page acceptance suite
    #[must_use]
    pub fn plus_code_links() -> Self {
        let root = NavigationTarget {
            path: "/".to_string(),
            fragment: None,
        };
        let invalid = root.clone().with_fragment(INVALID_PLUS_CODE);
        let valid = root.clone().with_fragment(VALID_PLUS_CODE);

        let mut suite = Self::new("plus-code-links");
        suite.add_case(TestCase::new(
            "renders [Locate Me] button",
            root,
            ExpectedControl::button("Locate Me"),
        ));
        suite.add_case(TestCase::new(
            "renders [Locate Me] button when passed invalid +code",
            invalid,
            ExpectedControl::button("Locate Me"),
        ));
        for provider in ["Waze", "Apple Maps", "Google Maps"] {
            suite.add_case(TestCase::new(
                format!("renders [{provider}] button when passed valid +code"),
                valid.clone(),
                ExpectedControl::button(provider),
            ));
        }
        suite
    }

    /// Parse a suite from YAML
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed or the suite fails validation
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let suite: Self = serde_yaml_ng::from_str(yaml)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Load a suite from a YAML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> E2eResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check version, emptiness and name uniqueness
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::InvalidSuite`] describing the first problem found
    pub fn validate(&self) -> E2eResult<()> {
        if self.version != SUITE_VERSION {
            return Err(E2eError::invalid_suite(format!(
                "unsupported version '{}', expected '{SUITE_VERSION}'",
                self.version
            )));
        }
        if self.cases.is_empty() {
            return Err(E2eError::invalid_suite("suite has no cases"));
        }
        let mut seen = HashSet::new();
        for case in &self.cases {
            if case.name.trim().is_empty() {
                return Err(E2eError::invalid_suite("case name must not be empty"));
            }
            if case.expected.name.trim().is_empty() {
                return Err(E2eError::invalid_suite(format!(
                    "case '{}' expects a control with an empty name",
                    case.name
                )));
            }
            if !seen.insert(case.name.as_str()) {
                return Err(E2eError::invalid_suite(format!(
                    "duplicate case name '{}'",
                    case.name
                )));
            }
        }
        Ok(())
    }

    /// Cases whose name contains `pattern`; all cases when `None`
    #[must_use]
    pub fn filtered(&self, pattern: Option<&str>) -> Vec<&TestCase> {
        self.cases
            .iter()
            .filter(|case| pattern.map_or(true, |p| case.name.contains(p)))
            .collect()
    }
}
