//! Reporter - summaries, JUnit XML and JSON for suite results.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────────────────┐
//! │ SuiteResults │ ──► │ Reporter                         │
//! └──────────────┘     │   summary()      one line        │
//!                      │   render_junit() CI systems      │
//!                      │   render_json()  tooling         │
//!                      └──────────────────────────────────┘
//! ```

use crate::result::E2eResult;
use crate::runner::{CaseResult, CaseStatus, SuiteResults};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Collects case results and renders reports
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    suite_name: String,
    results: Vec<CaseResult>,
    wall_time: Duration,
}

impl Reporter {
    /// Build a reporter from a finished run
    #[must_use]
    pub fn from_results(results: &SuiteResults) -> Self {
        Self {
            suite_name: results.suite_name.clone(),
            results: results.results.clone(),
            wall_time: results.duration,
        }
    }

    /// Get number of passed cases
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_passed()).count()
    }

    /// Get number of failed cases
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }

    /// Get number of skipped cases
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == CaseStatus::Skipped)
            .count()
    }

    /// Get total case count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Get pass rate (0.0 to 1.0)
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 1.0;
        }
        self.passed_count() as f64 / self.results.len() as f64
    }

    /// Check if no case failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Wall-clock time of the run, or the sum of case durations when unknown
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.wall_time
    }

    /// Get case results
    #[must_use]
    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    /// Get failing cases
    #[must_use]
    pub fn failures(&self) -> Vec<&CaseResult> {
        self.results.iter().filter(|r| r.is_failed()).collect()
    }

    /// Generate summary string
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{}: {}/{} passed ({:.1}%)",
            self.suite_name,
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0
        );
        if self.skipped_count() > 0 {
            line.push_str(&format!(", {} skipped", self.skipped_count()));
        }
        line
    }

    /// Write JUnit XML for CI integration
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn generate_junit(&self, output_path: &Path) -> E2eResult<()> {
        std::fs::write(output_path, self.render_junit())?;
        Ok(())
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let suite = escape_xml(&self.suite_name);
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            suite,
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        ));
        xml.push('\n');

        for result in &self.results {
            xml.push_str(&format!(
                r#"  <testcase classname="{}" name="{}" time="{:.3}">"#,
                suite,
                escape_xml(&result.name),
                result.duration.as_secs_f64()
            ));
            xml.push('\n');

            match result.status {
                CaseStatus::Failed => {
                    let message = result.message.as_deref().unwrap_or_default();
                    let kind = result.failure.map_or("failure", |k| k.as_str());
                    xml.push_str(&format!(
                        r#"    <failure type="{}" message="{}">{} {}: {}</failure>"#,
                        kind,
                        escape_xml(message),
                        escape_xml(&result.target),
                        escape_xml(&result.expected),
                        escape_xml(message)
                    ));
                    xml.push('\n');
                }
                CaseStatus::Skipped => xml.push_str("    <skipped/>\n"),
                CaseStatus::Passed => {}
            }

            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    /// Write the JSON report
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn generate_json(&self, output_path: &Path) -> E2eResult<()> {
        std::fs::write(output_path, self.render_json()?)?;
        Ok(())
    }

    /// Render the JSON report
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn render_json(&self) -> E2eResult<String> {
        let report = JsonReport {
            suite: &self.suite_name,
            total: self.total_count(),
            passed: self.passed_count(),
            failed: self.failed_count(),
            skipped: self.skipped_count(),
            duration_ms: self.total_duration().as_millis() as u64,
            cases: self
                .results
                .iter()
                .map(|r| JsonCase {
                    name: &r.name,
                    target: &r.target,
                    expected: &r.expected,
                    status: r.status,
                    failure: r.failure.map(|k| k.as_str()),
                    message: r.message.as_deref(),
                    duration_ms: r.duration.as_millis() as u64,
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    suite: &'a str,
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    duration_ms: u64,
    cases: Vec<JsonCase<'a>>,
}

#[derive(Serialize)]
struct JsonCase<'a> {
    name: &'a str,
    target: &'a str,
    expected: &'a str,
    status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    duration_ms: u64,
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
