//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use pluslink_e2e::{CaseResult, CaseStatus, TestCase};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output format for suite results on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report
    Json,
}

/// Progress reporter for suite execution
///
/// Progress, case lines and summaries go to stderr so stdout stays free for
/// `--format json`.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` cases
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Advance past a finished case
    pub fn case_finished(&self, result: &CaseResult) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(result.name.clone());
            pb.inc(1);
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Print one line per case; failures also print their message
    pub fn case_line(&self, result: &CaseResult) {
        let detail = format!("{} ({} {})", result.name, result.target, result.expected);
        match result.status {
            CaseStatus::Passed => self.success(&format!(
                "{detail} [{}ms]",
                result.duration.as_millis()
            )),
            CaseStatus::Failed => {
                let kind = result.failure.map_or("failure", |k| k.as_str());
                self.failure(&format!("{detail} [{kind}]"));
                if let Some(ref message) = result.message {
                    let _ = self.term.write_line(&format!("    {message}"));
                }
            }
            CaseStatus::Skipped => self.skipped(&detail),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Failures print even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a skipped message
    pub fn skipped(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("-").yellow().bold().to_string()
        } else {
            "SKIP".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print suite summary
    pub fn summary(&self, passed: usize, failed: usize, skipped: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        let _ = self.term.write_line("");

        let total = passed + failed + skipped;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            let _ = self.term.write_line(&format!(
                "{} {} cases in {:.2}s ({} passed, {} failed, {} skipped)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped)
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {total} cases in {duration_secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped)"
            ));
        }
    }
}

/// Render the `list` table for `cases`
#[must_use]
pub fn render_case_table(suite_name: &str, cases: &[&TestCase]) -> String {
    let target_width = cases
        .iter()
        .map(|c| c.target.to_string().len())
        .max()
        .unwrap_or(0)
        .max("TARGET".len());
    let expected_width = cases
        .iter()
        .map(|c| c.expected.to_string().len())
        .max()
        .unwrap_or(0)
        .max("EXPECT".len());

    let mut out = format!("{suite_name} ({} cases)\n", cases.len());
    out.push_str(&format!(
        "  {:<target_width$}  {:<expected_width$}  NAME\n",
        "TARGET", "EXPECT"
    ));
    for case in cases {
        out.push_str(&format!(
            "  {:<target_width$}  {:<expected_width$}  {}\n",
            case.target.to_string(),
            case.expected.to_string(),
            case.name
        ));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pluslink_e2e::{E2eError, ExpectedControl, NavigationTarget, TestSuite};

    fn case() -> TestCase {
        TestCase::new(
            "waze",
            NavigationTarget::parse("/#86x4rv66+99").unwrap(),
            ExpectedControl::button("Waze"),
        )
    }

    mod output_format_tests {
        use super::*;

        #[test]
        fn test_default_format() {
            assert_eq!(OutputFormat::default(), OutputFormat::Text);
        }
    }

    mod progress_reporter_tests {
        use super::*;

        #[test]
        fn test_new_reporter() {
            let reporter = ProgressReporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_quiet_reporter() {
            let reporter = ProgressReporter::new(false, true);
            assert!(reporter.quiet);
        }

        #[test]
        fn test_case_lines_for_every_status() {
            let reporter = ProgressReporter::new(false, false);
            let case = case();
            reporter.case_line(&CaseResult::passed("waze", &case, Duration::from_millis(12)));
            reporter.case_line(&CaseResult::failed(
                "waze",
                &case,
                &E2eError::Timeout {
                    ms: 5000,
                    waited_for: "button".to_string(),
                },
                Duration::from_secs(5),
            ));
            reporter.case_line(&CaseResult::skipped("waze", &case));
            // No panic = success
        }

        #[test]
        fn test_progress_bar() {
            let mut reporter = ProgressReporter::new(false, false);
            reporter.start_progress(2, "plus-code-links");
            reporter.case_finished(&CaseResult::skipped("a", &case()));
            reporter.case_finished(&CaseResult::skipped("b", &case()));
            reporter.finish();
            // No panic = success
        }

        #[test]
        fn test_quiet_mode_suppresses_output() {
            let mut reporter = ProgressReporter::new(false, true);
            reporter.start_progress(10, "suite");
            assert!(reporter.progress_bar.is_none());
            reporter.success("hidden");
            reporter.warning("hidden");
            reporter.info("hidden");
            reporter.header("hidden");
            reporter.failure("shown");
        }

        #[test]
        fn test_summary() {
            let reporter = ProgressReporter::new(false, false);
            reporter.summary(4, 1, 0, Duration::from_secs(3));
            // No panic = success
        }
    }

    mod table_tests {
        use super::*;

        #[test]
        fn test_table_lists_builtin_cases() {
            let suite = TestSuite::plus_code_links();
            let table = render_case_table(&suite.name, &suite.filtered(None));
            assert!(table.starts_with("plus-code-links (5 cases)"));
            assert!(table.contains("/#12345678+90"));
            assert!(table.contains("button \"Google Maps\""));
            assert_eq!(table.lines().count(), 7);
        }

        #[test]
        fn test_empty_table() {
            let table = render_case_table("empty", &[]);
            assert!(table.contains("(0 cases)"));
        }
    }
}
