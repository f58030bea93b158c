//! The retry loop, shared by every backoff strategy.

use async_trait::async_trait;
use std::error::Error;
use std::future::Future;
use std::time::Duration;

/// A strategy for re-invoking failed operations with a delay between attempts.
///
/// Implementations decide how many attempts are made, how long to wait before each retry, and
/// which failures are worth retrying. The loop itself is provided twice:
///
/// - [`execute`](BackoffStrategy::execute) for async operations, waiting with
///   `tokio::time::sleep` so the task yields to the scheduler
/// - [`execute_blocking`](BackoffStrategy::execute_blocking) for plain functions, waiting with
///   `std::thread::sleep`
///
/// Both run attempts strictly one after another. A non-retryable failure is returned at once,
/// without waiting. When every attempt fails, the failure from the final attempt is returned and
/// the earlier ones are dropped.
///
/// Neither loop has a cancellation hook of its own. Dropping the future returned by `execute`
/// (for example under `tokio::time::timeout`) abandons the remaining attempts.
///
/// # Examples
///
/// ```rust
/// use monorepo_core::retry::{BackoffStrategy, RetryPolicy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let policy = RetryPolicy::builder()
///     .max_attempts(3)
///     .initial_delay(Duration::from_millis(100))
///     .build();
///
/// let result = policy.execute(|| async {
///     // Your async operation here
///     Ok::<_, std::io::Error>(42)
/// }).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait BackoffStrategy: Send + Sync {
    /// Total number of invocations, including the first one.
    ///
    /// Values below 1 are treated as 1.
    fn max_attempts(&self) -> u32;

    /// Delay to wait before retry number `retry` (0-indexed).
    ///
    /// `next_delay(0)` is the wait between the first and second attempts.
    fn next_delay(&self, retry: u32) -> Duration;

    /// Whether a failure is transient and may be retried.
    ///
    /// Default implementation retries every failure.
    fn should_retry(&self, error: &(dyn Error + 'static)) -> bool {
        let _ = error;
        true
    }

    /// Run an async operation, retrying retryable failures.
    ///
    /// # Returns
    /// - `Ok(T)`: The first successful result
    /// - `Err(E)`: A non-retryable failure, or the failure from the last attempt
    async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Error + Send + Sync + 'static,
    {
        let max_attempts = self.max_attempts().max(1);
        let mut attempt = 1;
        loop {
            let err = match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => err,
            };
            let Some(delay) = delay_after_failure(self, &err, attempt, max_attempts) else {
                return Err(err);
            };
            drop(err);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Run a blocking operation, retrying retryable failures.
    ///
    /// The calling thread sleeps between attempts. Do not call this from inside an async task;
    /// use [`execute`](BackoffStrategy::execute) there.
    fn execute_blocking<F, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Error + 'static,
    {
        let max_attempts = self.max_attempts().max(1);
        let mut attempt = 1;
        loop {
            let err = match operation() {
                Ok(result) => return Ok(result),
                Err(err) => err,
            };
            let Some(delay) = delay_after_failure(self, &err, attempt, max_attempts) else {
                return Err(err);
            };
            drop(err);
            std::thread::sleep(delay);
            attempt += 1;
        }
    }
}

/// Decide what happens after attempt number `attempt` (1-indexed) failed with `error`.
///
/// Returns the delay before the next attempt, or `None` when the failure must be returned to the
/// caller. Every strategy goes through this check; it is not part of the overridable surface.
fn delay_after_failure<S>(
    strategy: &S,
    error: &(dyn Error + 'static),
    attempt: u32,
    max_attempts: u32,
) -> Option<Duration>
where
    S: BackoffStrategy + ?Sized,
{
    if !strategy.should_retry(error) {
        tracing::debug!(attempt, error = %error, "failure is not retryable");
        return None;
    }
    if attempt >= max_attempts {
        tracing::debug!(attempt, max_attempts, error = %error, "retry attempts exhausted");
        return None;
    }

    let delay = strategy.next_delay(attempt - 1);
    tracing::warn!(
        attempt,
        max_attempts,
        delay_ms = delay.as_millis() as u64,
        error = %error,
        "attempt failed, retrying"
    );
    Some(delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io;

    /// Minimal strategy that only supplies the three required knobs.
    struct Fixed {
        attempts: u32,
        retry_timeouts_only: bool,
    }

    impl BackoffStrategy for Fixed {
        fn max_attempts(&self) -> u32 {
            self.attempts
        }

        fn next_delay(&self, _retry: u32) -> Duration {
            Duration::ZERO
        }

        fn should_retry(&self, error: &(dyn Error + 'static)) -> bool {
            !self.retry_timeouts_only
                || error
                    .downcast_ref::<io::Error>()
                    .is_some_and(|e| e.kind() == io::ErrorKind::TimedOut)
        }
    }

    fn always_fail(calls: &Cell<u32>, kind: io::ErrorKind) -> Result<(), io::Error> {
        calls.set(calls.get() + 1);
        Err(io::Error::from(kind))
    }

    #[test]
    fn test_attempt_bound_applies_to_custom_strategies() {
        let strategy = Fixed {
            attempts: 4,
            retry_timeouts_only: false,
        };
        let calls = Cell::new(0);
        let result = strategy.execute_blocking(|| always_fail(&calls, io::ErrorKind::TimedOut));
        assert!(result.is_err());
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_zero_attempts_still_runs_once() {
        let strategy = Fixed {
            attempts: 0,
            retry_timeouts_only: false,
        };
        let calls = Cell::new(0);
        let _ = strategy.execute_blocking(|| always_fail(&calls, io::ErrorKind::TimedOut));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_retryable_check_applies_to_custom_strategies() {
        let strategy = Fixed {
            attempts: 5,
            retry_timeouts_only: true,
        };
        let calls = Cell::new(0);
        let err = strategy
            .execute_blocking(|| always_fail(&calls, io::ErrorKind::PermissionDenied))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_attempt_bound_applies_to_custom_strategies() {
        let strategy = Fixed {
            attempts: 3,
            retry_timeouts_only: false,
        };
        let calls = std::sync::atomic::AtomicU32::new(0);
        let result = strategy
            .execute(|| {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async { Err::<(), _>(io::Error::from(io::ErrorKind::TimedOut)) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }
}
