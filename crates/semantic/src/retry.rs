//! Retry with exponential backoff for transient transport failures.
//!
//! Only the HTTP provider uses this. [`EmbeddingClient`](crate::EmbeddingClient)
//! itself never retries: a batch that still fails after the transport gave up
//! aborts the whole call.

use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call.
    pub max_retries: u32,
    /// Base delay between retries (doubled on every attempt).
    #[serde(with = "millis", rename = "base_delay_ms")]
    pub base_delay: Duration,
    /// Upper bound for a single delay, before jitter.
    #[serde(with = "millis", rename = "max_delay_ms")]
    pub max_delay: Duration,
    /// Add 0-50% random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Outcome of [`execute_with_retry`].
#[derive(Debug, Clone)]
pub struct RetryResult<T, E> {
    pub result: Result<T, E>,
    /// Number of attempts made (1 = no retries needed).
    pub attempts: u32,
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Runs `operation` until it succeeds, returns an error `should_retry`
/// rejects, or the retry budget is spent. The attempt number (starting at 0)
/// is passed to every call.
pub async fn execute_with_retry<T, E, F, Fut, P>(
    config: &RetryConfig,
    should_retry: P,
    mut operation: F,
) -> RetryResult<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let start = Instant::now();
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return RetryResult {
                    result: Ok(value),
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                };
            }
            Err(error) if attempt < config.max_retries && should_retry(&error) => {
                let delay = calculate_delay(config, attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "retrying embedding request"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                return RetryResult {
                    result: Err(error),
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                };
            }
        }
    }
}

/// Delay before retry number `attempt + 1`.
fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.base_delay.as_millis() as u64;
    let exponential = base.saturating_mul(2_u64.saturating_pow(attempt));
    let delay = exponential.min(config.max_delay.as_millis() as u64);

    if config.jitter {
        let jitter = fastrand::u64(0..=delay / 2);
        Duration::from_millis(delay + jitter)
    } else {
        Duration::from_millis(delay)
    }
}

/// HTTP statuses worth another attempt: request timeout, throttling, and
/// upstream server errors.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429) || (500..=599).contains(&status)
}

/// Delays travel as whole milliseconds in config files.
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::default()
            .with_base_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2))
            .with_jitter(false)
    }

    #[tokio::test]
    async fn retry_succeeds_eventually() {
        let calls = AtomicU32::new(0);
        let result = execute_with_retry(&fast(), |_: &String| true, |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("not yet".to_string())
                } else {
                    Ok("success")
                }
            }
        })
        .await;

        assert!(result.succeeded());
        assert_eq!(result.attempts, 3);
        assert_eq!(result.into_result().unwrap(), "success");
    }

    #[tokio::test]
    async fn retry_gives_up_after_budget() {
        let config = fast().with_max_retries(2);
        let result: RetryResult<(), String> =
            execute_with_retry(&config, |_| true, |_| async { Err("down".to_string()) }).await;

        assert!(!result.succeeded());
        assert_eq!(result.attempts, 3);
        assert_eq!(result.into_result().unwrap_err(), "down");
    }

    #[tokio::test]
    async fn non_retryable_error_fails_immediately() {
        let calls = AtomicU32::new(0);
        let result: RetryResult<(), String> = execute_with_retry(
            &fast(),
            |err: &String| !err.contains("401"),
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("HTTP 401".to_string()) }
            },
        )
        .await;

        assert_eq!(result.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_config_makes_single_attempt() {
        let result: RetryResult<(), String> =
            execute_with_retry(&RetryConfig::disabled(), |_| true, |_| async {
                Err("timeout".to_string())
            })
            .await;
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn delay_grows_and_caps() {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(350))
            .with_jitter(false);
        assert_eq!(calculate_delay(&config, 0), Duration::from_millis(100));
        assert_eq!(calculate_delay(&config, 1), Duration::from_millis(200));
        assert_eq!(calculate_delay(&config, 2), Duration::from_millis(350));
        assert_eq!(calculate_delay(&config, 40), Duration::from_millis(350));
    }

    #[test]
    fn jitter_stays_within_half() {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_millis(100))
            .with_jitter(true);
        for _ in 0..50 {
            let delay = calculate_delay(&config, 0).as_millis();
            assert!((100..=150).contains(&delay));
        }
    }

    #[test]
    fn retryable_statuses() {
        for status in [408, 429, 500, 502, 503, 504] {
            assert!(is_retryable_status(status), "{status}");
        }
        for status in [400, 401, 403, 404, 422] {
            assert!(!is_retryable_status(status), "{status}");
        }
    }

    #[test]
    fn config_serializes_delays_as_millis() {
        let json = serde_json::to_value(RetryConfig::default()).unwrap();
        assert_eq!(json["base_delay_ms"], 200);
        assert_eq!(json["max_delay_ms"], 10_000);
    }
}
