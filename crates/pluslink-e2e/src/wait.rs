//! Bounded polling for page conditions.
//!
//! Every assertion in the suite is "eventually true within a window": the page
//! renders asynchronously after navigation, so a probe is re-run until it
//! reports ready, reports a fatal condition, or the deadline passes.

use crate::result::{E2eError, E2eResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Outcome of a single probe
#[derive(Debug)]
pub enum Probe<T> {
    /// Condition met
    Ready(T),
    /// Not yet; carries a description of the observed state
    Pending(String),
    /// Stop polling and fail with this error
    Fatal(E2eError),
}

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult<T> {
    /// Value produced by the ready probe
    pub value: T,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of probes run
    pub polls: u32,
}

/// Poll `probe` until it is ready, fatal, or `options.timeout_ms` elapses.
///
/// A probe that is still running when the deadline passes is cancelled.
///
/// # Errors
///
/// Returns [`E2eError::Timeout`] naming `description` and the last observed
/// state, or the error carried by a [`Probe::Fatal`].
pub async fn wait_for<T, F, Fut>(
    description: &str,
    options: &WaitOptions,
    mut probe: F,
) -> E2eResult<WaitResult<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Probe<T>>,
{
    let start = Instant::now();
    let deadline = start + options.timeout();
    let mut polls = 0_u32;
    let mut last_state = String::from("never probed");

    loop {
        match tokio::time::timeout_at(deadline, probe()).await {
            Ok(Probe::Ready(value)) => {
                polls += 1;
                tracing::debug!(polls, waited_for = description, "wait satisfied");
                return Ok(WaitResult {
                    value,
                    elapsed: start.elapsed(),
                    polls,
                });
            }
            Ok(Probe::Fatal(err)) => return Err(err),
            Ok(Probe::Pending(state)) => {
                polls += 1;
                tracing::trace!(polls, state = %state, "still waiting");
                last_state = state;
            }
            Err(_elapsed) => {
                last_state = format!("{last_state}; probe still running at deadline");
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(E2eError::Timeout {
                ms: options.timeout_ms,
                waited_for: format!("{description} (last state: {last_state})"),
            });
        }
        let remaining = deadline - now;
        tokio::time::sleep(options.poll_interval().min(remaining)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    mod options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let options = WaitOptions::default();
            assert_eq!(options.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(options.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_builder() {
            let options = WaitOptions::new().with_timeout(250).with_poll_interval(10);
            assert_eq!(options.timeout(), Duration::from_millis(250));
            assert_eq!(options.poll_interval(), Duration::from_millis(10));
        }
    }

    mod wait_tests {
        use super::*;

        #[tokio::test]
        async fn test_ready_immediately() {
            let options = WaitOptions::new().with_timeout(100);
            let result = wait_for("ready", &options, || async { Probe::Ready(7) })
                .await
                .unwrap();
            assert_eq!(result.value, 7);
            assert_eq!(result.polls, 1);
        }

        #[tokio::test]
        async fn test_ready_after_some_polls() {
            let counter = AtomicU32::new(0);
            let options = WaitOptions::new().with_timeout(2_000).with_poll_interval(5);
            let result = wait_for("third poll", &options, || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n >= 2 {
                        Probe::Ready(n)
                    } else {
                        Probe::Pending(format!("poll {n}"))
                    }
                }
            })
            .await
            .unwrap();
            assert_eq!(result.value, 2);
            assert_eq!(result.polls, 3);
        }

        #[tokio::test]
        async fn test_timeout_reports_last_state() {
            let options = WaitOptions::new().with_timeout(60).with_poll_interval(10);
            let err = wait_for("button \"Waze\"", &options, || async {
                Probe::<()>::Pending("0 matches".to_string())
            })
            .await
            .unwrap_err();

            match err {
                E2eError::Timeout { ms, waited_for } => {
                    assert_eq!(ms, 60);
                    assert!(waited_for.contains("button \"Waze\""));
                    assert!(waited_for.contains("0 matches"));
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_fatal_stops_polling() {
            let counter = AtomicU32::new(0);
            let options = WaitOptions::new().with_timeout(1_000).with_poll_interval(5);
            let err = wait_for("strict", &options, || {
                counter.fetch_add(1, Ordering::SeqCst);
                async {
                    Probe::<()>::Fatal(E2eError::StrictModeViolation {
                        locator: "button".to_string(),
                        count: 2,
                    })
                }
            })
            .await
            .unwrap_err();
            assert!(matches!(err, E2eError::StrictModeViolation { count: 2, .. }));
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_hung_probe_is_cancelled() {
            let options = WaitOptions::new().with_timeout(50).with_poll_interval(5);
            let started = std::time::Instant::now();
            let err = wait_for("hung", &options, || async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Probe::Ready(())
            })
            .await
            .unwrap_err();
            assert!(matches!(err, E2eError::Timeout { .. }));
            assert!(started.elapsed() < Duration::from_secs(5));
        }
    }
}
