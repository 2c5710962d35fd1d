//! Retry assertions with polling.
//!
//! UI updates land asynchronously, so every expectation and every action's
//! actionability check is polled until it holds or the command timeout
//! elapses.

use crate::result::ProbeResult;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

/// Default command timeout (4 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 4000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionCheckResult {
    /// Assertion passed
    Pass,
    /// Assertion failed with a description of what was observed
    Fail(String),
}

impl AssertionCheckResult {
    /// Check if the result is a pass
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Check if the result is a fail
    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total timeout duration
    pub timeout: Duration,
    /// Interval between attempts
    pub poll_interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with timeout
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Short timeout, fast polling. For deterministic drivers.
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            timeout: Duration::from_millis(100),
            poll_interval: Duration::from_millis(5),
        }
    }
}

/// Statistics of a successful retry
#[derive(Debug, Clone, Copy)]
pub struct RetryResult {
    /// Number of attempts before success
    pub attempts: usize,
    /// Total duration of all attempts
    pub duration: Duration,
}

/// The check never passed within the timeout
#[derive(Debug, Clone)]
pub struct RetryError {
    /// Last failure message
    pub message: String,
    /// Number of attempts made
    pub attempts: usize,
    /// Total duration of all attempts
    pub duration: Duration,
}

impl std::fmt::Display for RetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "assertion failed after {} attempt(s) ({:.2}s): {}",
            self.attempts,
            self.duration.as_secs_f64(),
            self.message
        )
    }
}

impl std::error::Error for RetryError {}

/// Outcome of polling a check
#[derive(Debug, Clone)]
pub enum RetryOutcome {
    /// The check passed
    Passed(RetryResult),
    /// The timeout elapsed first
    Exhausted(RetryError),
}

impl RetryOutcome {
    /// Check if the check eventually passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }
}

/// Poll `check` until it passes or `config.timeout` elapses.
///
/// The check is always attempted at least once. Errors returned by the
/// check itself (driver failures) abort polling immediately.
pub async fn poll_until<F, Fut>(config: RetryConfig, mut check: F) -> ProbeResult<RetryOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<AssertionCheckResult>>,
{
    let start = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;

        let message = match check().await? {
            AssertionCheckResult::Pass => {
                return Ok(RetryOutcome::Passed(RetryResult {
                    attempts,
                    duration: start.elapsed(),
                }));
            }
            AssertionCheckResult::Fail(msg) => msg,
        };

        if start.elapsed() >= config.timeout {
            return Ok(RetryOutcome::Exhausted(RetryError {
                message,
                attempts,
                duration: start.elapsed(),
            }));
        }

        tokio::time::sleep(config.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ProbeError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_config() {
            let config = RetryConfig::default();
            assert_eq!(config.timeout, Duration::from_millis(4000));
            assert_eq!(config.poll_interval, Duration::from_millis(50));
        }

        #[test]
        fn test_builder() {
            let config =
                RetryConfig::new(Duration::from_secs(1)).with_poll_interval(Duration::from_millis(10));
            assert_eq!(config.timeout, Duration::from_secs(1));
            assert_eq!(config.poll_interval, Duration::from_millis(10));
        }

        #[test]
        fn test_fast_is_shorter_than_default() {
            assert!(RetryConfig::fast().timeout < RetryConfig::default().timeout);
        }
    }

    mod polling_tests {
        use super::*;

        #[tokio::test]
        async fn test_passes_immediately() {
            let outcome = poll_until(RetryConfig::fast(), || async {
                Ok(AssertionCheckResult::Pass)
            })
            .await
            .unwrap();
            let RetryOutcome::Passed(result) = outcome else {
                panic!("expected pass");
            };
            assert_eq!(result.attempts, 1);
        }

        #[tokio::test]
        async fn test_passes_after_retries() {
            let calls = AtomicUsize::new(0);
            let outcome = poll_until(RetryConfig::new(Duration::from_secs(2)), || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n >= 2 {
                        Ok(AssertionCheckResult::Pass)
                    } else {
                        Ok(AssertionCheckResult::Fail(format!("attempt {n}")))
                    }
                }
            })
            .await
            .unwrap();
            let RetryOutcome::Passed(result) = outcome else {
                panic!("expected pass");
            };
            assert_eq!(result.attempts, 3);
        }

        #[tokio::test]
        async fn test_exhausted_keeps_last_message() {
            let calls = AtomicUsize::new(0);
            let outcome = poll_until(RetryConfig::fast(), || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(AssertionCheckResult::Fail(format!("attempt {n}"))) }
            })
            .await
            .unwrap();
            let RetryOutcome::Exhausted(err) = outcome else {
                panic!("expected exhaustion");
            };
            assert!(err.attempts >= 1);
            assert_eq!(err.message, format!("attempt {}", err.attempts - 1));
            assert!(err.to_string().contains("assertion failed after"));
        }

        #[tokio::test]
        async fn test_driver_error_aborts() {
            let calls = AtomicUsize::new(0);
            let result = poll_until(RetryConfig::new(Duration::from_secs(5)), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProbeError::page("target closed")) }
            })
            .await;
            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }
}
