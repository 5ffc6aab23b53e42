//! Retry with exponential backoff for transient backend failures.

use std::future::Future;
use std::time::Duration;

use log::warn;
use tnkb_core::ports::ApiError;

/// Upper bound for a single backoff delay.
const MAX_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How often and how patiently a failed request is repeated.
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each following one.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Delay before the given retry (1-based). Zero for the first attempt.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 1_u32 << (retry - 1).min(16);
        self.backoff.saturating_mul(factor).min(MAX_DELAY)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy runs out of retries. The last error is returned in the latter case.
pub(crate) async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retry = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && retry < policy.max_retries => {
                retry += 1;
                let delay = policy.delay_for_retry(retry);
                warn!(
                    "Attempt {retry} of {} failed: {err}, retrying in {delay:?}",
                    policy.max_retries.saturating_add(1)
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff: Duration::ZERO,
        }
    }

    #[test]
    fn backoff_doubles_and_is_capped() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_for_retry(0), Duration::ZERO);
        assert_eq!(policy.delay_for_retry(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_retry(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for_retry(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for_retry(10), MAX_DELAY);
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = with_retry(policy(3), || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(ApiError::Status { status: 503 })
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.expect("third attempt succeeds"), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), ApiError> = with_retry(policy(2), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Status { status: 502 })
        })
        .await;

        assert!(matches!(result, Err(ApiError::Status { status: 502 })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), ApiError> = with_retry(policy(3), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Status { status: 404 })
        })
        .await;

        assert!(matches!(result, Err(ApiError::Status { status: 404 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unbounded_retry_budget_logs_without_overflow() {
        log::set_max_level(log::LevelFilter::Warn);

        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = with_retry(policy(u32::MAX), || async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ApiError::Status { status: 503 })
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.expect("second attempt succeeds"), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
